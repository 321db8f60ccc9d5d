//! Task engine port
//!
//! Defines the interface to whatever actually performs build work (copying,
//! compiling, packaging). The core only assembles [`TaskInvocation`]s and
//! hands them over; it never touches the file system itself.

use thiserror::Error;

use crate::console::Console;
use crate::core::models::{Attributes, Value};

/// Message prefix an engine uses to report an unknown task
pub const TASK_NOT_FOUND_PREFIX: &str = "Problem: failed to create task or type";

/// Errors reported by a task engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The engine has no task or type of this name
    #[error("Problem: failed to create task or type {0}")]
    NotFound(String),

    /// The task ran and failed
    #[error("{task}: {message}")]
    Failed {
        /// Task name
        task: String,
        /// What went wrong
        message: String,
    },
}

impl TaskError {
    /// Create a failure for `task`
    #[must_use]
    pub fn failed(task: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            task: task.into(),
            message: message.into(),
        }
    }

    /// Whether the engine did not know the task at all
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// One task call: name, attributes, and nested elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskInvocation {
    /// Task (or nested element) name
    pub name: String,
    /// Attributes in call order
    pub attributes: Attributes,
    /// Nested elements collected from the call's body
    pub children: Vec<Self>,
}

impl TaskInvocation {
    /// Create an invocation without nested elements
    #[must_use]
    pub fn new(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            attributes,
            children: Vec::new(),
        }
    }

    /// Add a nested element
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Attribute rendered as a string
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<String> {
        self.attributes.get_string(key)
    }

    /// Attribute that must be present
    pub fn require(&self, key: &str) -> Result<String, TaskError> {
        self.attribute(key).ok_or_else(|| {
            TaskError::failed(&self.name, format!("{key} attribute must be set"))
        })
    }

    /// Boolean attribute with a default
    #[must_use]
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.attributes.get(key).map_or(default, Value::is_truthy)
    }

    /// Whether a nested element at any depth has the given name
    #[must_use]
    pub fn has_element(&self, name: &str) -> bool {
        self.children.iter().any(|c| c.name == name || c.has_element(name))
    }

    /// Nested elements with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// Performs the work behind task calls
///
/// Implementations are driven from a single thread; a run owns its engine
/// exclusively through the task builder.
pub trait TaskEngine {
    /// Execute one task, returning the value handed back to the script
    fn execute(&mut self, task: &TaskInvocation, console: &Console) -> Result<Value, TaskError>;

    /// Look up an engine-level property (e.g. a host definition)
    fn property(&self, name: &str) -> Option<String> {
        let _ = name;
        None
    }
}
