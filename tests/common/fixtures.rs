//! Test fixtures and builders
//!
//! Provides temporary project directories and sample datasets.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Wide Fama-French style table: two dates, two portfolios, percent returns
pub const WIDE_CSV: &str = "date,SMALL LoBM,BIG HiBM\n20200101,1.0,2.0\n20200102,-99.99,4.0\n";

/// A temporary project directory
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Root of the project
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, path: &str) -> PathBuf {
        self.dir.path().join(path)
    }

    /// Write a file, creating parent directories
    pub fn write(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Write pipeline.toml
    pub fn pipeline(&self, content: &str) -> PathBuf {
        self.write("pipeline.toml", content)
    }

    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.join(path)).unwrap()
    }

    pub fn exists(&self, path: &str) -> bool {
        self.join(path).exists()
    }

    /// Set a file's modification time to `secs` after the epoch
    pub fn set_mtime(&self, path: &str, secs: u64) {
        let file = fs::File::options().write(true).open(self.join(path)).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}
