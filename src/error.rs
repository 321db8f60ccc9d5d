//! Error taxonomy and exit codes
//!
//! Every failure inside a run is a [`GantError`]. The driver turns the
//! error that aborted a run into a process status with
//! [`GantError::exit_code`].

use thiserror::Error;

use crate::core::ports::TaskError;
use crate::script::ScriptError;

/// Status of a successful run
pub const EXIT_SUCCESS: i32 = 0;

/// Status of a run aborted by a failing target or task
pub const EXIT_FAILURE: i32 = 1;

/// Status of a run whose script failed to load
pub const EXIT_SCRIPT_ERROR: i32 = 2;

/// Status of a run asked for a target that does not exist
pub const EXIT_UNKNOWN_TARGET: i32 = 3;

/// Errors raised while loading a script or driving targets
#[derive(Debug, Error)]
pub enum GantError {
    /// Target name not in the binding at drive time
    #[error("Target {0} does not exist.")]
    UnknownTarget(String),

    /// `depends` argument is neither a body, a target name, nor a list of those
    #[error("depends called with an argument ({0}) that is not a known target or list of targets.")]
    UnknownDependency(String),

    /// Name used inside a body is neither a target, a builtin, nor a task
    #[error("No such method: {0}")]
    MissingMethod(String),

    /// Name looked up in the binding is absent
    #[error("No such property: {0}")]
    MissingVariable(String),

    /// Task proxy received an argument that is neither an attribute map nor a body
    #[error("Unexpected type of parameter to method {0}")]
    UnexpectedArgument(String),

    /// The task engine did not know the task, or the task failed
    #[error(transparent)]
    Task(#[from] TaskError),

    /// Script failed to load or evaluate
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// IO error outside of a task
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GantError {
    /// Process status for a run aborted by this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownTarget(_) => EXIT_UNKNOWN_TARGET,
            Self::Script(_) => EXIT_SCRIPT_ERROR,
            _ => EXIT_FAILURE,
        }
    }

    /// Whether this is the engine reporting an unknown task
    #[must_use]
    pub const fn is_task_not_found(&self) -> bool {
        matches!(self, Self::Task(TaskError::NotFound(_)))
    }
}
