//! A minimal reader for compiled blobs, used to check round trips.

use crate::charset::{Charset, ESCAPE};
use crate::serialize::{FLAG_CHILD, FLAG_TERMINAL};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedEntry {
    pub ch: char,
    pub freq: Option<u8>,
    pub child: Option<u32>,
}

/// Decodes the node record at `addr` of a blob that starts at `base`.
pub fn decode_node(blob: &[u8], base: u32, addr: u32, charset: Charset) -> Vec<DecodedEntry> {
    let mut pos = (addr - base) as usize;
    let count = blob[pos];
    pos += 1;

    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let ch = if blob[pos] == ESCAPE {
            let cp = u16::from_be_bytes([blob[pos + 1], blob[pos + 2]]);
            pos += 3;
            char::from_u32(cp as u32).expect("escaped code point")
        } else {
            pos += 1;
            charset.decode(blob[pos - 1]).expect("defined byte")
        };

        let flags = blob[pos];
        let child = if flags & FLAG_CHILD != 0 {
            let addr = u32::from_be_bytes([0, flags & 0x3F, blob[pos + 1], blob[pos + 2]]);
            pos += 3;
            Some(addr)
        } else {
            pos += 1;
            None
        };
        let freq = if flags & FLAG_TERMINAL != 0 {
            pos += 1;
            Some(blob[pos - 1])
        } else {
            None
        };
        entries.push(DecodedEntry { ch, freq, child });
    }
    entries
}

/// Decodes every word of a blob whose root record sits at `base`, in
/// code point order.
pub fn decode_words(blob: &[u8], base: u32, charset: Charset) -> Vec<(String, u8)> {
    fn walk(
        blob: &[u8],
        base: u32,
        addr: u32,
        charset: Charset,
        prefix: &mut String,
        out: &mut Vec<(String, u8)>,
    ) {
        for entry in decode_node(blob, base, addr, charset) {
            prefix.push(entry.ch);
            if let Some(freq) = entry.freq {
                out.push((prefix.clone(), freq));
            }
            if let Some(child) = entry.child {
                assert!(child > addr, "child {child} not after parent {addr}");
                walk(blob, base, child, charset, prefix, out);
            }
            prefix.pop();
        }
    }

    let mut out = Vec::new();
    walk(blob, base, base, charset, &mut String::new(), &mut out);
    out
}
