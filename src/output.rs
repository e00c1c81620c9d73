//! Crash-safe output of a compiled blob.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Result;

/// Writes `bytes` to `path` through a temporary file in the same directory.
///
/// The destination is replaced only once every byte is on disk; on any
/// error the temporary file is removed and `path` is left as it was.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    debug!(tmp = %tmp.path().display(), dest = %path.display(), "persisting output");
    tmp.persist(path)?;
    Ok(())
}
