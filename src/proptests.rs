use super::*;

use crate::test_utils::{decode_node, decode_words};
use proptest::prelude::*;
use std::collections::{BTreeMap, VecDeque};

/// Checks that every record in `bytes` sits at its layout address and
/// that child pointers only point forward.
fn validate_blob(trie: &Trie, layout: &Layout, bytes: &[u8], charset: Charset) {
    assert_eq!(bytes.len(), layout.total_bytes());

    let mut queue = VecDeque::new();
    queue.push_back((trie.root(), layout.base()));
    let mut visited = 0usize;
    while let Some((node, addr)) = queue.pop_front() {
        assert_eq!(addr, layout.addr(visited), "node {visited} misplaced");
        visited += 1;

        let decoded = decode_node(bytes, layout.base(), addr, charset);
        assert_eq!(decoded.len(), node.len());
        for ((c, entry), d) in node.entries().zip(decoded) {
            assert_eq!(c, d.ch);
            assert_eq!(entry.freq(), d.freq);
            assert!(entry.is_terminal() || entry.child().is_some(), "empty entry {c:?}");
            match (entry.child(), d.child) {
                (Some(child), Some(child_addr)) => {
                    assert!(child_addr > addr);
                    queue.push_back((child, child_addr));
                }
                (None, None) => {}
                other => panic!("child mismatch under {c:?}: {:?}", other.1),
            }
        }
    }
    assert_eq!(visited, layout.len());
}

fn word_strategy() -> impl Strategy<Value = String> + Clone {
    // ASCII, Greek (single byte in ISO-8859-7) and a few escaped letters.
    let alphabet = prop::sample::select(vec!['a', 'b', 'c', 'z', 'α', 'β', 'ά', 'ω', 'é', 'ß', 'ÿ', 'Ж']);
    prop::collection::vec(alphabet, 1..=8).prop_map(|cs| cs.into_iter().collect())
}

fn records_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec((word_strategy(), 0u64..10_000), 0..=200).prop_map(|mut pairs| {
        pairs.sort_by(|a, b| b.1.cmp(&a.1));
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (w, raw))| Record::raw(i + 1, w, raw))
            .collect()
    })
}

fn charset_strategy() -> impl Strategy<Value = Charset> {
    prop_oneof![Just(Charset::Greek), Just(Charset::Latin1)]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_round_trip(
        pairs in prop::collection::vec((word_strategy(), any::<u8>()), 0..=300),
        charset in charset_strategy(),
        base in 0u32..0x1000,
    ) {
        let mut t = Trie::new();
        let mut m: BTreeMap<String, u8> = BTreeMap::new();
        for (w, f) in &pairs {
            prop_assert!(t.insert(w, *f, InsertMode::Grow));
            m.insert(w.clone(), *f);
        }

        let layout = Layout::compute(t.root(), charset, base).unwrap();
        let bytes = serialize(t.root(), &layout, charset).unwrap();
        validate_blob(&t, &layout, &bytes, charset);

        let expected: Vec<(String, u8)> = m.into_iter().collect();
        let got = decode_words(&bytes, base, charset);
        // BTreeMap orders by UTF-8 bytes, which agrees with code point order.
        prop_assert_eq!(&got, &expected);
        prop_assert_eq!(t.words().collect::<Vec<_>>(), expected);

        let again = serialize(t.root(), &Layout::compute(t.root(), charset, base).unwrap(), charset).unwrap();
        prop_assert_eq!(bytes, again);
    }

    #[test]
    fn prop_conserve_never_grows(
        grown in prop::collection::vec(word_strategy(), 0..=100),
        probes in prop::collection::vec(word_strategy(), 0..=100),
    ) {
        let mut t = Trie::new();
        for w in &grown {
            t.insert(w, 1, InsertMode::Grow);
        }
        let nodes = t.node_count();

        for w in &probes {
            let before = t.clone();
            let ok = t.insert(w, 2, InsertMode::Conserve);
            if ok {
                prop_assert_eq!(t.get(w), Some(2));
            } else {
                prop_assert_eq!(&t, &before);
            }
            prop_assert_eq!(t.node_count(), nodes);

            let before = t.clone();
            if !t.insert(w, 3, InsertMode::ConserveBytes) {
                prop_assert_eq!(&t, &before);
            }
        }
    }

    #[test]
    fn prop_byte_conserving_backfill_keeps_layout(
        records in records_strategy(),
        threshold in 0u64..5_000,
        charset in charset_strategy(),
    ) {
        let config = BuildConfig {
            threshold,
            backfill: false,
            backfill_policy: BackfillPolicy::Bytes,
            charset,
            ..BuildConfig::default()
        };
        let mut builder = Builder::new(config).unwrap();
        builder.grow_pass(&records, &mut NoProgress).unwrap();
        let (_, before) = builder.compile().unwrap();
        builder.backfill_pass(&records, &mut NoProgress).unwrap();
        let (_, after) = builder.compile().unwrap();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_backfill_keeps_node_addresses_in_order(
        records in records_strategy(),
        threshold in 0u64..5_000,
    ) {
        let config = BuildConfig { threshold, backfill: false, ..BuildConfig::default() };
        let mut builder = Builder::new(config).unwrap();
        builder.grow_pass(&records, &mut NoProgress).unwrap();
        let (_, before) = builder.compile().unwrap();
        builder.backfill_pass(&records, &mut NoProgress).unwrap();
        let (bytes, after) = builder.compile().unwrap();

        prop_assert_eq!(before.len(), after.len());
        for i in 0..after.len() {
            // A node may gain one freq byte per entry turned terminal.
            prop_assert!(after.size(i) >= before.size(i));
        }
        validate_blob(builder.trie(), &after, &bytes, Charset::Greek);
        prop_assert!(builder.trie().words().all(|(_, w)| w > 0));
    }

    #[test]
    fn prop_positive_raw_gets_positive_weight(
        mut raws in prop::collection::vec(0u64..u64::MAX / 2, 1..=100),
        transform in prop_oneof![Just(Transform::Identity), Just(Transform::Log), Just(Transform::Sqrt)],
        scale in 1u8..=255,
    ) {
        raws.sort_unstable_by(|a, b| b.cmp(a));
        let mut q = Quantizer::new(transform, scale).unwrap();
        let mut previous = u8::MAX;
        for (i, &raw) in raws.iter().enumerate() {
            let w = q.quantize(i + 1, raw).unwrap();
            prop_assert!(w <= scale);
            prop_assert!(w <= previous, "weights must not increase");
            if raw > 0 {
                prop_assert!(w >= 1);
            } else {
                prop_assert_eq!(w, 0);
            }
            previous = w;
        }
    }
}

#[test]
fn conserve_failure_leaves_no_partial_node() {
    let mut t = Trie::new();
    t.insert("cat", 5, InsertMode::Grow);
    let before = t.clone();

    for probe in ["car", "cats", "catalog", "dog", "c", "ca"] {
        let mut copy = t.clone();
        let ok = copy.insert(probe, 9, InsertMode::Conserve);
        match probe {
            "c" | "ca" => assert!(ok, "{probe} lies on an existing path"),
            _ => {
                assert!(!ok, "{probe} needs new structure");
                assert_eq!(copy, before);
            }
        }
    }
    assert_eq!(t, before);
}

#[test]
fn scenario_prefix_word_blob() {
    let mut t = Trie::new();
    t.insert("a", 5, InsertMode::Grow);
    t.insert("ab", 3, InsertMode::Grow);
    t.insert("ac", 7, InsertMode::Grow);

    let layout = Layout::compute(t.root(), Charset::Greek, 0).unwrap();
    let bytes = serialize(t.root(), &layout, Charset::Greek).unwrap();
    validate_blob(&t, &layout, &bytes, Charset::Greek);

    let root = decode_node(&bytes, 0, 0, Charset::Greek);
    assert_eq!(root.len(), 1);
    assert_eq!(root[0].ch, 'a');
    assert_eq!(root[0].freq, Some(5));
    let child = root[0].child.expect("'a' owns a child");
    assert!(child > layout.addr(0));

    let entries = decode_node(&bytes, 0, child, Charset::Greek);
    let summary: Vec<(char, Option<u8>, Option<u32>)> =
        entries.iter().map(|e| (e.ch, e.freq, e.child)).collect();
    assert_eq!(summary, vec![('b', Some(3), None), ('c', Some(7), None)]);
}
