//! Mock implementations of port traits for testing
//!
//! These mocks provide configurable behavior for unit testing
//! without real I/O operations.

use ffpipe::core::ActionError;
use ffpipe::core::models::{ShellCommand, Verbosity};
use ffpipe::core::ports::{CommandRunner, FileSystem};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// In-memory filesystem with a logical clock
///
/// Every `touch` moves the clock forward, so a file touched later is
/// always strictly newer.
pub struct MemoryFileSystem {
    files: RefCell<HashMap<PathBuf, SystemTime>>,
    clock: Cell<u64>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self {
            files: RefCell::new(HashMap::new()),
            clock: Cell::new(0),
        }
    }

    /// Create or update a file at the next clock tick
    pub fn touch(&self, path: impl AsRef<Path>) {
        let tick = self.clock.get() + 1;
        self.clock.set(tick);
        self.files
            .borrow_mut()
            .insert(path.as_ref().to_path_buf(), SystemTime::UNIX_EPOCH + Duration::from_secs(tick));
    }

    pub fn delete(&self, path: impl AsRef<Path>) {
        self.files.borrow_mut().remove(path.as_ref());
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files.borrow().contains_key(path.as_ref())
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MemoryFileSystem {
    fn modified(&self, path: &Path) -> io::Result<Option<SystemTime>> {
        Ok(self.files.borrow().get(path).copied())
    }

    fn remove(&self, path: &Path) -> io::Result<bool> {
        Ok(self.files.borrow_mut().remove(path).is_some())
    }
}

/// Command runner that records commands and simulates their effects
///
/// Commands registered with `produces` touch their files on success;
/// commands registered with `fails` exit with status 1.
pub struct RecordingRunner<'a> {
    fs: &'a MemoryFileSystem,
    outputs: HashMap<String, Vec<PathBuf>>,
    failing: HashSet<String>,
    calls: RefCell<Vec<(String, Verbosity)>>,
}

impl<'a> RecordingRunner<'a> {
    pub fn new(fs: &'a MemoryFileSystem) -> Self {
        Self {
            fs,
            outputs: HashMap::new(),
            failing: HashSet::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn produces(mut self, command: &str, paths: &[&str]) -> Self {
        self.outputs
            .insert(command.to_string(), paths.iter().map(PathBuf::from).collect());
        self
    }

    pub fn fails(mut self, command: &str) -> Self {
        self.failing.insert(command.to_string());
        self
    }

    /// Commands run so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(c, _)| c.clone()).collect()
    }

    /// Verbosity each command ran with
    pub fn verbosities(&self) -> Vec<Verbosity> {
        self.calls.borrow().iter().map(|(_, v)| *v).collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl CommandRunner for RecordingRunner<'_> {
    fn run(&self, command: &ShellCommand, verbosity: Verbosity) -> Result<(), ActionError> {
        self.calls.borrow_mut().push((command.command.clone(), verbosity));
        if self.failing.contains(&command.command) {
            return Err(ActionError::Exit {
                command: command.command.clone(),
                code: Some(1),
                stderr: "simulated failure".to_string(),
            });
        }
        if let Some(paths) = self.outputs.get(&command.command) {
            for path in paths {
                self.fs.touch(path);
            }
        }
        Ok(())
    }
}
