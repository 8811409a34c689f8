//! Filesystem port
//!
//! Staleness checks only need modification times; `clean` also removes
//! targets. Everything else the pipeline writes goes through actions.

use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Timestamp queries and target removal
pub trait FileSystem {
    /// Last modification time, or `None` when the path does not exist
    fn modified(&self, path: &Path) -> io::Result<Option<SystemTime>>;

    /// Whether the path exists
    fn exists(&self, path: &Path) -> io::Result<bool> {
        Ok(self.modified(path)?.is_some())
    }

    /// Remove a file, or a directory if it is empty
    ///
    /// Returns `false` when nothing was removed (missing path, or a
    /// directory that still has entries).
    fn remove(&self, path: &Path) -> io::Result<bool>;
}
