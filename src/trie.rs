//! In-memory character trie with size-aware insertion.

use smallvec::SmallVec;

/// How an insertion may change the shape of the trie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertMode {
    /// Create entries and child nodes as needed.
    Grow,
    /// Only succeed along an existing path of entries and child nodes.
    /// An existing pass-through entry may become terminal.
    Conserve,
    /// Like [`InsertMode::Conserve`], and the final entry must already be
    /// terminal, so no node record changes size.
    ConserveBytes,
}

impl InsertMode {
    #[inline]
    fn conserves(self) -> bool {
        !matches!(self, InsertMode::Grow)
    }
}

/// The value stored under one character of a [`Node`].
///
/// A linked entry always has a frequency, a child, or both.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entry {
    freq: Option<u8>,
    child: Option<Box<Node>>,
}

impl Entry {
    /// Weight of the word ending at this entry, if one does.
    #[inline]
    pub fn freq(&self) -> Option<u8> {
        self.freq
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.freq.is_some()
    }

    #[inline]
    pub fn child(&self) -> Option<&Node> {
        self.child.as_deref()
    }

    fn descend(&mut self, tail: &[char], freq: u8, mode: InsertMode) -> bool {
        if tail.is_empty() {
            if mode == InsertMode::ConserveBytes && self.freq.is_none() {
                return false;
            }
            self.freq = Some(freq);
            return true;
        }
        match self.child.as_deref_mut() {
            Some(child) => child.insert_chars(tail, freq, mode),
            None if mode.conserves() => false,
            None => {
                // Linked only once the deeper insert has succeeded.
                let mut child = Box::new(Node::new());
                if !child.insert_chars(tail, freq, mode) {
                    return false;
                }
                self.child = Some(child);
                true
            }
        }
    }
}

/// A trie vertex: entries sorted by code point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
    entries: SmallVec<[(char, Entry); 4]>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in this node.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in code point order.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = (char, &Entry)> + '_ {
        self.entries.iter().map(|(c, e)| (*c, e))
    }

    pub fn entry(&self, c: char) -> Option<&Entry> {
        self.search(c).ok().map(|idx| &self.entries[idx].1)
    }

    /// Child nodes in code point order of their entries.
    pub fn children(&self) -> impl Iterator<Item = &Node> + '_ {
        self.entries.iter().filter_map(|(_, e)| e.child())
    }

    #[inline]
    fn search(&self, c: char) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&c, |(k, _)| *k)
    }

    fn insert_chars(&mut self, word: &[char], freq: u8, mode: InsertMode) -> bool {
        let Some((&head, tail)) = word.split_first() else {
            return false;
        };
        match self.search(head) {
            Ok(idx) => self.entries[idx].1.descend(tail, freq, mode),
            Err(_) if mode.conserves() => false,
            Err(pos) => {
                let mut entry = Entry::default();
                if !entry.descend(tail, freq, mode) {
                    return false;
                }
                self.entries.insert(pos, (head, entry));
                true
            }
        }
    }
}

/// A word trie rooted at the empty prefix.
///
/// ```rust
/// use wordtrie::{InsertMode, Trie};
///
/// let mut trie = Trie::new();
/// assert!(trie.insert("cat", 9, InsertMode::Grow));
/// assert!(!trie.insert("car", 4, InsertMode::Conserve));
/// assert_eq!(trie.get("cat"), Some(9));
/// assert_eq!(trie.get("car"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trie {
    root: Node,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Records `word` with weight `freq`, overwriting any earlier weight.
    ///
    /// Returns `true` iff the word is now stored with `freq`. An empty word
    /// is rejected. In a conserving mode a rejected word leaves the trie
    /// untouched.
    pub fn insert(&mut self, word: &str, freq: u8, mode: InsertMode) -> bool {
        let chars: SmallVec<[char; 32]> = word.chars().collect();
        self.root.insert_chars(&chars, freq, mode)
    }

    pub fn get(&self, word: &str) -> Option<u8> {
        let mut node = &self.root;
        let mut chars = word.chars().peekable();
        while let Some(c) = chars.next() {
            let entry = node.entry(c)?;
            if chars.peek().is_none() {
                return entry.freq();
            }
            node = entry.child()?;
        }
        None
    }

    pub fn contains(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    /// Number of stored words.
    pub fn len(&self) -> usize {
        self.words().count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }

    /// Stored words and weights in code point order.
    pub fn words(&self) -> Words<'_> {
        let mut stack = Vec::new();
        push_entries(&mut stack, "", &self.root);
        Words { stack }
    }
}

fn push_entries<'a>(stack: &mut Vec<(String, &'a Entry)>, prefix: &str, node: &'a Node) {
    for (c, entry) in node.entries().rev() {
        let mut word = String::with_capacity(prefix.len() + c.len_utf8());
        word.push_str(prefix);
        word.push(c);
        stack.push((word, entry));
    }
}

/// Iterator over the words of a [`Trie`].
pub struct Words<'a> {
    stack: Vec<(String, &'a Entry)>,
}

impl<'a> Iterator for Words<'a> {
    type Item = (String, u8);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((word, entry)) = self.stack.pop() {
            if let Some(child) = entry.child() {
                push_entries(&mut self.stack, &word, child);
            }
            if let Some(freq) = entry.freq() {
                return Some((word, freq));
            }
        }
        None
    }
}
