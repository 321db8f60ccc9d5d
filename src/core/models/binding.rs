//! The binding: names visible to a build script
//!
//! Populated while the script is evaluated, consulted while targets run.
//! Targets live here under their own name; their descriptions are indexed
//! alongside so the tool can list them.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::target::{Body, Target};
use super::value::Value;
use crate::core::services::TaskBuilder;
use crate::error::GantError;

/// Binding key of the task builder proxy
pub const ANT: &str = "ant";

/// Capitalised alias of [`ANT`]
///
/// Deprecated: kept so older scripts keep working. New scripts use `ant`.
pub const ANT_ALIAS: &str = "Ant";

/// Name of the target driven when none is requested
pub const DEFAULT_TARGET: &str = "default";

/// A registered target as listed to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetInfo {
    /// Target name
    pub name: String,
    /// Target description (may be empty)
    pub description: String,
}

/// Name to value mapping shared by the resolver and the task builder
#[derive(Debug, Clone, Default)]
pub struct Binding {
    variables: HashMap<String, Value>,
    descriptions: BTreeMap<String, String>,
}

impl Binding {
    /// Create an empty binding
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a binding with `builder` bound as both `ant` and `Ant`
    #[must_use]
    pub fn with_builder(builder: TaskBuilder) -> Self {
        let mut binding = Self::new();
        binding.set_builder(builder);
        binding
    }

    /// Bind `builder` as both `ant` and `Ant`
    pub fn set_builder(&mut self, builder: TaskBuilder) {
        self.set(ANT, Value::Builder(builder.clone()));
        self.set(ANT_ALIAS, Value::Builder(builder));
    }

    /// Look up a name; exact match, no case folding
    pub fn get(&self, name: &str) -> Result<&Value, GantError> {
        self.variables.get(name).ok_or_else(|| GantError::MissingVariable(name.to_string()))
    }

    /// Bind a name, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Register a target under its name and index its description
    pub fn register_target(&mut self, target: Target) {
        log::debug!("registering target {} ({})", target.name, target.body.id());
        self.descriptions.insert(target.name.clone(), target.description);
        self.variables.insert(target.name, Value::Body(target.body));
    }

    /// The body bound under `name`, if that name holds one
    #[must_use]
    pub fn target_body(&self, name: &str) -> Option<&Body> {
        self.variables.get(name).and_then(Value::as_body)
    }

    /// Description of a registered target
    #[must_use]
    pub fn description(&self, name: &str) -> Option<&str> {
        self.descriptions.get(name).map(String::as_str)
    }

    /// Registered targets still bound to a body, sorted by name
    #[must_use]
    pub fn targets(&self) -> Vec<TargetInfo> {
        self.descriptions
            .iter()
            .filter(|(name, _)| self.target_body(name).is_some())
            .map(|(name, description)| TargetInfo {
                name: name.clone(),
                description: description.clone(),
            })
            .collect()
    }

    /// The task builder bound as `ant`
    #[must_use]
    pub fn task_builder(&self) -> Option<TaskBuilder> {
        match self.variables.get(ANT) {
            Some(Value::Builder(builder)) => Some(builder.clone()),
            _ => None,
        }
    }
}
