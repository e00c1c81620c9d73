//! # wordtrie
//!
//! Compiles a frequency-ranked word list into a compact binary trie for
//! word-completion and spell-checking readers that address at most 4 MiB
//! and store text in a single-byte charset.
//!
//! A build runs in two passes over the source. The grow pass inserts
//! every word above a frequency threshold. The optional backfill pass
//! adds the remaining words whose paths already exist, which recovers
//! coverage without new nodes or entries. The trie is then laid out
//! breadth first and serialized.
//!
//! ## Example
//!
//! ```rust
//! use wordtrie::{Builder, BuildConfig, NoProgress, Record};
//!
//! let source = vec![
//!     Record::raw(1, "a", 1000),
//!     Record::raw(2, "ab", 500),
//!     Record::raw(3, "ac", 1),
//! ];
//! let compiled = Builder::new(BuildConfig::default())
//!     .unwrap()
//!     .build(&source, &mut NoProgress)
//!     .unwrap();
//!
//! assert_eq!(compiled.trie.get("ab"), Some(128));
//! assert_eq!(compiled.bytes[0], 1); // one entry in the root record
//! ```

pub mod builder;
pub mod charset;
pub mod error;
pub mod layout;
pub mod output;
pub mod quantize;
pub mod serialize;
pub mod source;
pub mod trie;

pub use builder::{BackfillPolicy, BuildConfig, Builder, Compiled, NoProgress, Pass, PassStats, Progress};
pub use charset::Charset;
pub use error::{Error, Result};
pub use layout::Layout;
pub use output::write_atomic;
pub use quantize::{Quantizer, Transform};
pub use serialize::serialize;
pub use source::{FileSource, FrequencySource, Record, SourceFormat};
pub use trie::{Entry, InsertMode, Node, Trie};

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod test_utils;
