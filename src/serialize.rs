//! Binary emission of a laid-out trie.
//!
//! Record layout, all multi-byte fields big endian:
//!
//! ```text
//! NodeRecord = count:u8, count * Entry
//! Entry      = Char Trailer
//! Char       = byte                     (encodable in the charset)
//!            | 0xFF, code_point:u16     (escaped)
//! Trailer    = flags:u8 [freq:u8]                   (no child)
//!            | pointer:u24 [freq:u8]                (child)
//! pointer    = bit 23 terminal, bit 22 has-child, bits 0..=21 child address
//! ```
//!
//! `freq` is present iff the terminal bit is set.

use std::collections::VecDeque;

use crate::charset::{Charset, ESCAPE};
use crate::error::{Error, Result};
use crate::layout::{Layout, ADDRESS_MASK};
use crate::trie::{Entry, Node};

/// Terminal flag in the first trailer byte.
pub const FLAG_TERMINAL: u8 = 0x80;
/// Has-child flag in the first trailer byte.
pub const FLAG_CHILD: u8 = 0x40;

/// Writes every node record of the trie under `root`.
///
/// `layout` must have been computed for the same trie and charset;
/// otherwise this fails with [`Error::LayoutMismatch`] rather than emit
/// dangling pointers.
pub fn serialize(root: &Node, layout: &Layout, charset: Charset) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(layout.total_bytes());
    let mut queue = VecDeque::new();
    queue.push_back(root);
    // Root is node 0; the next node enqueued is the next one visited.
    let mut enqueued = 1usize;
    let mut visited = 0usize;

    while let Some(node) = queue.pop_front() {
        let addr = node_addr(layout, visited)?;
        if out.len() as u64 + layout.base() as u64 != addr as u64 {
            return Err(Error::LayoutMismatch { node: visited });
        }
        visited += 1;

        let count = u8::try_from(node.len()).map_err(|_| Error::NodeFanout {
            entries: node.len(),
        })?;
        out.push(count);

        for (c, entry) in node.entries() {
            write_char(&mut out, c, charset)?;
            let child_addr = match entry.child() {
                Some(child) => {
                    let addr = node_addr(layout, enqueued)?;
                    enqueued += 1;
                    queue.push_back(child);
                    Some(addr)
                }
                None => None,
            };
            write_trailer(&mut out, entry, child_addr)?;
        }
    }

    if visited != layout.len() || out.len() != layout.total_bytes() {
        return Err(Error::LayoutMismatch { node: visited });
    }
    Ok(out)
}

#[inline]
fn node_addr(layout: &Layout, idx: usize) -> Result<u32> {
    layout
        .addrs()
        .get(idx)
        .copied()
        .ok_or(Error::LayoutMismatch { node: idx })
}

#[inline]
fn write_char(out: &mut Vec<u8>, c: char, charset: Charset) -> Result<()> {
    if let Some(b) = charset.encode(c) {
        out.push(b);
        return Ok(());
    }
    let cp = u16::try_from(c as u32).map_err(|_| Error::UnencodableChar(c))?;
    out.push(ESCAPE);
    out.extend_from_slice(&cp.to_be_bytes());
    Ok(())
}

#[inline]
fn write_trailer(out: &mut Vec<u8>, entry: &Entry, child_addr: Option<u32>) -> Result<()> {
    let terminal = if entry.is_terminal() { FLAG_TERMINAL } else { 0 };
    match child_addr {
        Some(addr) => {
            if addr > ADDRESS_MASK {
                return Err(Error::AddressOverflow { addr: addr as u64 });
            }
            let flags = (terminal | FLAG_CHILD) as u32;
            let pointer = (flags << 16) | addr;
            out.extend_from_slice(&pointer.to_be_bytes()[1..]);
        }
        None => {
            debug_assert!(entry.is_terminal(), "entry with neither child nor freq");
            out.push(terminal);
        }
    }
    if let Some(freq) = entry.freq() {
        out.push(freq);
    }
    Ok(())
}
