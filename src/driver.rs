//! The driver: load a script, then achieve targets
//!
//! A [`Gant`] owns everything a run needs: the binding the script populates,
//! the executed-set that keeps each body to one execution, and the console
//! the run reports through. Creating a driver resets the process-wide
//! verbosity and dry-run knobs to their defaults.
//!
//! ```no_run
//! use gant::Gant;
//!
//! let mut gant = Gant::new();
//! gant.load_script("target(name: 'hello') { println 'hi' }")?;
//! assert_eq!(gant.process_targets_named("hello"), 0);
//! # Ok::<(), gant::GantError>(())
//! ```

use std::path::Path;

use crate::adapters::LocalTaskEngine;
use crate::console::Console;
use crate::core::models::{Binding, Body, DEFAULT_TARGET, Target, TargetInfo, Value, Verbosity};
use crate::core::services::{ExecutedSet, TargetContext, TaskBuilder};
use crate::error::{EXIT_SUCCESS, GantError};
use crate::script::Script;
use crate::state;

/// Build class name used until a script file names one
pub const DEFAULT_BUILD_CLASS_NAME: &str = "build";

/// Script driver
#[derive(Debug)]
pub struct Gant {
    binding: Binding,
    executed: ExecutedSet,
    console: Console,
    build_class_name: String,
}

impl Default for Gant {
    fn default() -> Self {
        Self::new()
    }
}

impl Gant {
    /// Driver with a local task engine rooted at the current directory
    #[must_use]
    pub fn new() -> Self {
        let engine = LocalTaskEngine::current_dir().unwrap_or_else(|e| {
            log::warn!("cannot resolve the current directory, using '.': {e}");
            LocalTaskEngine::new(".")
        });
        Self::with_builder(TaskBuilder::new(engine))
    }

    /// Driver whose `ant` is the given task builder
    #[must_use]
    pub fn with_builder(builder: TaskBuilder) -> Self {
        Self::with_binding(Binding::with_builder(builder))
    }

    /// Driver over a prepared binding
    ///
    /// The binding should hold a task builder under `ant`; without one,
    /// names that are not targets fail with a missing method error.
    #[must_use]
    pub fn with_binding(binding: Binding) -> Self {
        state::reset();
        Self {
            binding,
            executed: ExecutedSet::new(),
            console: Console::stdout(),
            build_class_name: DEFAULT_BUILD_CLASS_NAME.to_string(),
        }
    }

    /// Replace the output channel
    #[must_use]
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    /// The output channel of this driver
    #[must_use]
    pub const fn console(&self) -> &Console {
        &self.console
    }

    /// The binding
    #[must_use]
    pub const fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Bodies run so far
    #[must_use]
    pub const fn executed(&self) -> &ExecutedSet {
        &self.executed
    }

    /// Label used in log records
    #[must_use]
    pub fn build_class_name(&self) -> &str {
        &self.build_class_name
    }

    /// Set the label used in log records
    pub fn set_build_class_name(&mut self, name: impl Into<String>) {
        self.build_class_name = name.into();
    }

    /// Set the process-wide verbosity
    pub fn set_verbosity(&mut self, level: Verbosity) {
        log::debug!("{}: verbosity {level}", self.build_class_name);
        state::set_verbosity(level);
    }

    /// Set the process-wide dry-run flag
    pub fn set_dry_run(&mut self, enabled: bool) {
        log::debug!("{}: dry run {enabled}", self.build_class_name);
        state::set_dry_run(enabled);
    }

    /// Bind a variable visible to the script
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.binding.set(name, value);
    }

    /// Register a target implemented in Rust
    pub fn add_target<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        body: F,
    ) -> Body
    where
        F: Fn(&mut TargetContext<'_>) -> Result<Value, GantError> + 'static,
    {
        let body = Body::new(body);
        self.binding.register_target(Target::new(name, description, body.clone()));
        body
    }

    /// Parse and run script text
    pub fn load_script(&mut self, source: &str) -> Result<(), GantError> {
        let script = Script::parse(self.build_class_name.clone(), source)?;
        self.load(&script)
    }

    /// Read, parse and run a script file
    ///
    /// The build class name becomes the file name with `.` replaced by `_`.
    pub fn load_file(&mut self, path: &Path) -> Result<(), GantError> {
        let script = Script::read(path)?;
        if let Some(name) = path.file_name() {
            self.build_class_name = name.to_string_lossy().replace('.', "_");
        }
        self.load(&script)
    }

    /// Run a parsed script's top level against this driver's binding
    pub fn load(&mut self, script: &Script) -> Result<(), GantError> {
        log::debug!("{}: loading {}", self.build_class_name, script.label());
        self.with_context(|ctx| script.run(ctx))?;
        Ok(())
    }

    /// Run `f` with a context over this driver's binding and executed-set
    pub fn with_context<R>(&mut self, f: impl FnOnce(&mut TargetContext<'_>) -> R) -> R {
        let mut ctx = TargetContext::new(&mut self.binding, &mut self.executed, &self.console);
        f(&mut ctx)
    }

    /// Registered targets, sorted by name
    #[must_use]
    pub fn targets(&self) -> Vec<TargetInfo> {
        self.binding.targets()
    }

    /// Description of the `default` target, if one is registered
    #[must_use]
    pub fn default_target(&self) -> Option<&str> {
        self.binding
            .target_body(DEFAULT_TARGET)
            .and_then(|_| self.binding.description(DEFAULT_TARGET))
    }

    /// Achieve one target, unless it already ran in this driver
    pub fn achieve(&mut self, name: &str) -> Result<Value, GantError> {
        let body = self
            .binding
            .target_body(name)
            .cloned()
            .ok_or_else(|| GantError::UnknownTarget(name.to_string()))?;
        log::debug!("{}: achieving {name}", self.build_class_name);
        self.with_context(|ctx| ctx.run_once(&body))
    }

    /// Achieve the `default` target
    pub fn process_targets(&mut self) -> i32 {
        self.process_targets_named(DEFAULT_TARGET)
    }

    /// Achieve one named target
    pub fn process_targets_named(&mut self, name: &str) -> i32 {
        match self.achieve(name) {
            Ok(_) => EXIT_SUCCESS,
            Err(e) => self.report(&e),
        }
    }

    /// Achieve targets in order, stopping at the first failure
    ///
    /// An empty list achieves the `default` target.
    pub fn process_targets_list<S: AsRef<str>>(&mut self, names: &[S]) -> i32 {
        if names.is_empty() {
            return self.process_targets();
        }
        for name in names {
            let code = self.process_targets_named(name.as_ref());
            if code != EXIT_SUCCESS {
                return code;
            }
        }
        EXIT_SUCCESS
    }

    fn report(&self, error: &GantError) -> i32 {
        log::debug!("{}: {error:?}", self.build_class_name);
        self.console.message(Verbosity::ErrorsOnly, &error.to_string());
        error.exit_code()
    }
}
