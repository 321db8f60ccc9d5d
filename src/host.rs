//! Running Gant from another build tool
//!
//! [`GantTask`] is what a host build hands a Gantfile to. It mirrors the
//! attributes a host task element would carry: `file`, `target`, nested
//! `gantTarget` values and nested `definition` name/value pairs.
//! Definitions become task engine properties before the script loads, so a
//! script sees them as variables.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::adapters::LocalTaskEngine;
use crate::console::Console;
use crate::core::models::{Attributes, Binding, Value};
use crate::core::services::TaskBuilder;
use crate::driver::Gant;
use crate::error::{EXIT_SUCCESS, GantError};

/// Script file used when none is named
pub const DEFAULT_GANTFILE: &str = "build.gant";

/// Property prefix under which the environment is exposed
pub const ENVIRONMENT_PREFIX: &str = "environment";

/// Failures reported to the host build
#[derive(Debug, Error)]
pub enum HostError {
    /// The script file is missing
    #[error("Gantfile does not exist.")]
    MissingGantfile(PathBuf),

    /// Definitions could not be declared, or the script failed to load
    #[error("Unable to load Gantfile: {0}")]
    Load(#[source] GantError),

    /// The driver returned a non-zero status
    #[error("Gant execution failed with return code {0}.")]
    Failed(i32),
}

impl HostError {
    /// Process status equivalent of this failure
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::MissingGantfile(_) => crate::error::EXIT_SCRIPT_ERROR,
            Self::Load(e) => e.exit_code(),
            Self::Failed(code) => *code,
        }
    }
}

/// A `name`/`value` pair declared by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Property name
    pub name: String,
    /// Property value
    pub value: String,
}

/// Host-side handle running one Gantfile
#[derive(Debug, Clone)]
pub struct GantTask {
    base_dir: PathBuf,
    file: PathBuf,
    target: Option<String>,
    gant_targets: Vec<String>,
    definitions: Vec<Definition>,
    console: Console,
}

impl GantTask {
    /// Task for the host project rooted at `base_dir`
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            file: PathBuf::from(DEFAULT_GANTFILE),
            target: None,
            gant_targets: Vec::new(),
            definitions: Vec::new(),
            console: Console::stdout(),
        }
    }

    /// Output channel for the run
    #[must_use]
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    /// Script path, relative to the base directory unless absolute
    pub fn set_file(&mut self, file: impl Into<PathBuf>) {
        self.file = file.into();
    }

    /// Single target to achieve
    pub fn set_target(&mut self, target: impl Into<String>) {
        self.target = Some(target.into());
    }

    /// Additional target, as a nested `gantTarget` element
    pub fn add_gant_target(&mut self, value: impl Into<String>) {
        self.gant_targets.push(value.into());
    }

    /// Property to declare before the script loads
    pub fn add_definition(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.definitions.push(Definition {
            name: name.into(),
            value: value.into(),
        });
    }

    /// The resolved script path
    #[must_use]
    pub fn gantfile(&self) -> PathBuf {
        if self.file.is_absolute() {
            self.file.clone()
        } else {
            self.base_dir.join(&self.file)
        }
    }

    /// Targets to achieve: `target` first, then the `gantTarget` values
    #[must_use]
    pub fn targets(&self) -> Vec<String> {
        self.target.iter().chain(&self.gant_targets).cloned().collect()
    }

    /// Run the Gantfile
    ///
    /// With no targets named, the `default` target is achieved.
    pub fn execute(&self) -> Result<(), HostError> {
        let gantfile = self.gantfile();
        if !gantfile.is_file() {
            return Err(HostError::MissingGantfile(gantfile));
        }

        let builder = TaskBuilder::new(LocalTaskEngine::new(&self.base_dir));
        let mut gant = Gant::with_binding(Binding::with_builder(builder.clone()))
            .with_console(self.console.clone());

        self.declare_definitions(&mut gant, &builder).map_err(HostError::Load)?;
        gant.load_file(&gantfile).map_err(HostError::Load)?;

        let code = gant.process_targets_list(&self.targets());
        if code == EXIT_SUCCESS {
            Ok(())
        } else {
            Err(HostError::Failed(code))
        }
    }

    /// Declare the environment and every definition as properties, quietly
    fn declare_definitions(&self, gant: &mut Gant, builder: &TaskBuilder) -> Result<(), GantError> {
        let console = self.console.clone();
        let _quiet = console.suppress();
        gant.with_context(|ctx| {
            let environment = Attributes::new().with("environment", ENVIRONMENT_PREFIX);
            builder.invoke(ctx, "property", vec![Value::Map(environment)])?;
            for definition in &self.definitions {
                log::debug!("defining {} = {}", definition.name, definition.value);
                let attributes = Attributes::new()
                    .with("name", definition.name.as_str())
                    .with("value", definition.value.as_str());
                builder.invoke(ctx, "property", vec![Value::Map(attributes)])?;
            }
            Ok(())
        })
    }
}

/// Run `file` under `base_dir` with the given targets and definitions
pub fn run(
    base_dir: &Path,
    file: &Path,
    targets: &[String],
    definitions: &[Definition],
) -> Result<(), HostError> {
    let mut task = GantTask::new(base_dir);
    task.set_file(file);
    for target in targets {
        task.add_gant_target(target.as_str());
    }
    for definition in definitions {
        task.add_definition(definition.name.as_str(), definition.value.as_str());
    }
    task.execute()
}
