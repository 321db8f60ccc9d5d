//! Shared test fixtures and helpers
//!
//! This module provides common utilities for testing gant components.


pub use mocks::RecordingEngine;

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use gant::{Captured, Console, Gant, TaskBuilder, TaskInvocation, Verbosity};
use tempfile::TempDir;

/// Invocations seen by a [`RecordingEngine`]
pub type TaskLog = Rc<RefCell<Vec<TaskInvocation>>>;

/// A driver wired to a recording engine and a captured console
pub struct Harness {
    pub gant: Gant,
    pub output: Captured,
    pub log: TaskLog,
}

impl Harness {
    /// Fresh driver; every task name is known to the engine
    pub fn new() -> Self {
        Self::with_engine(RecordingEngine::new())
    }

    /// Fresh driver whose engine only knows the given tasks
    pub fn knowing(tasks: &[&str]) -> Self {
        Self::with_engine(RecordingEngine::knowing(tasks))
    }

    fn with_engine(engine: RecordingEngine) -> Self {
        let log = engine.log();
        let (console, output) = Console::capture();
        let gant = Gant::with_builder(TaskBuilder::new(engine)).with_console(console);
        Self { gant, output, log }
    }

    /// Set run mode; call after construction since a new driver resets it
    pub fn mode(mut self, dry_run: bool, verbosity: Verbosity) -> Self {
        self.gant.set_dry_run(dry_run);
        self.gant.set_verbosity(verbosity);
        self
    }

    /// Load a script, panicking on failure
    pub fn load(mut self, source: &str) -> Self {
        self.gant.load_script(source).unwrap();
        self
    }

    /// Achieve targets and return the status
    pub fn run(&mut self, targets: &[&str]) -> i32 {
        self.gant.process_targets_list(targets)
    }

    /// Everything printed so far
    pub fn stdout(&self) -> String {
        self.output.contents()
    }

    /// Names of the tasks the engine executed, in order
    pub fn task_names(&self) -> Vec<String> {
        self.log.borrow().iter().map(|t| t.name.clone()).collect()
    }
}

/// A temporary project directory
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// Create an empty project
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Get the root path of the project
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file, creating parent directories
    pub fn add_file(&self, path: &str, content: &str) {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }

    /// Read a file back
    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.dir.path().join(path)).unwrap()
    }

    /// Whether a path exists
    pub fn exists(&self, path: &str) -> bool {
        self.dir.path().join(path).exists()
    }
}
