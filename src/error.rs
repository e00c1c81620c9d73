//! Error type shared by every stage of a dictionary build.

use std::io;

/// Result type for dictionary builds.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while reading a frequency source or compiling a trie.
///
/// Every variant is fatal for the build that produced it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading the source or writing the blob failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A source line does not match the expected record layout.
    #[error("line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// The source is not sorted by descending raw frequency.
    #[error("line {line}: raw frequency {current} follows {previous}; input must be sorted by descending frequency")]
    UnsortedInput {
        /// 1-based line number of the offending record.
        line: usize,
        /// Raw frequency of the preceding record.
        previous: u64,
        /// Raw frequency of the offending record.
        current: u64,
    },

    /// A node has more entries than its one-byte count field can hold.
    #[error("node has {entries} entries, at most 255 fit in a node record")]
    NodeFanout {
        /// Number of entries in the node.
        entries: usize,
    },

    /// A node address does not fit the 22-bit address field.
    #[error("node address {addr:#x} exceeds the 22-bit address space")]
    AddressOverflow {
        /// The address that was about to be assigned.
        addr: u64,
    },

    /// A character cannot be written, not even through the escape form.
    #[error("character {0:?} is outside the Basic Multilingual Plane")]
    UnencodableChar(char),

    /// A layout was computed for a different trie or charset.
    #[error("layout does not describe node {node} of the trie being serialized")]
    LayoutMismatch {
        /// Breadth-first index of the first node that disagrees.
        node: usize,
    },

    /// A build option is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The finished blob could not be moved into place.
    #[error("failed to persist output: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl Error {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        Error::Parse {
            line,
            reason: reason.into(),
        }
    }
}
