//! Node size model and breadth-first address assignment.
//!
//! Node records are laid out in breadth-first order, so every address is
//! known before the record of the parent that points at it is written.
//! Both this pass and the serializer visit nodes in the same order; the
//! `i`-th node dequeued here is the `i`-th node the serializer writes.

use std::collections::VecDeque;

use crate::charset::Charset;
use crate::error::{Error, Result};
use crate::trie::{Entry, Node};

/// Largest address a 3-byte child pointer can hold.
pub const ADDRESS_MASK: u32 = 0x3F_FFFF;

/// Most entries a node record can declare.
pub const MAX_ENTRIES: usize = u8::MAX as usize;

const COUNT_SIZE: u32 = 1;
const CHAR_SIZE: u32 = 1;
const ESCAPED_CHAR_SIZE: u32 = 3;
const ADDR_SIZE: u32 = 3;
const NULL_SIZE: u32 = 1;
const FREQ_SIZE: u32 = 1;

/// Bytes needed to write `c`.
#[inline]
pub fn char_size(c: char, charset: Charset) -> Result<u32> {
    if charset.encode(c).is_some() {
        Ok(CHAR_SIZE)
    } else if (c as u32) <= u16::MAX as u32 {
        Ok(ESCAPED_CHAR_SIZE)
    } else {
        Err(Error::UnencodableChar(c))
    }
}

#[inline]
fn trailer_size(entry: &Entry) -> u32 {
    let addr = if entry.child().is_some() {
        ADDR_SIZE
    } else {
        NULL_SIZE
    };
    let freq = if entry.is_terminal() { FREQ_SIZE } else { 0 };
    addr + freq
}

/// Exact size in bytes of the record for `node`.
pub fn node_size(node: &Node, charset: Charset) -> Result<u32> {
    if node.len() > MAX_ENTRIES {
        return Err(Error::NodeFanout {
            entries: node.len(),
        });
    }
    let mut size = COUNT_SIZE;
    for (c, entry) in node.entries() {
        size += char_size(c, charset)? + trailer_size(entry);
    }
    Ok(size)
}

/// Addresses and sizes of every node, in breadth-first order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    base: u32,
    addrs: Vec<u32>,
    sizes: Vec<u32>,
    end: u64,
}

impl Layout {
    /// Assigns addresses to the trie under `root`, starting at `base`.
    ///
    /// Fails on the first node whose address does not fit 22 bits.
    pub fn compute(root: &Node, charset: Charset, base: u32) -> Result<Self> {
        let mut addrs = Vec::new();
        let mut sizes = Vec::new();
        let mut cursor = base as u64;
        let mut queue = VecDeque::new();
        queue.push_back(root);

        while let Some(node) = queue.pop_front() {
            if cursor > ADDRESS_MASK as u64 {
                return Err(Error::AddressOverflow { addr: cursor });
            }
            let size = node_size(node, charset)?;
            addrs.push(cursor as u32);
            sizes.push(size);
            cursor += size as u64;
            queue.extend(node.children());
        }

        Ok(Self {
            base,
            addrs,
            sizes,
            end: cursor,
        })
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    /// Address of the `idx`-th node in breadth-first order.
    #[inline]
    pub fn addr(&self, idx: usize) -> u32 {
        self.addrs[idx]
    }

    #[inline]
    pub fn size(&self, idx: usize) -> u32 {
        self.sizes[idx]
    }

    pub fn addrs(&self) -> &[u32] {
        &self.addrs
    }

    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    /// Address one past the last record.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Total bytes of all records.
    pub fn total_bytes(&self) -> usize {
        (self.end - self.base as u64) as usize
    }
}
