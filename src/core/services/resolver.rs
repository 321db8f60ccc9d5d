//! Target resolver
//!
//! A target body receives a [`TargetContext`] and routes every call it makes
//! through [`TargetContext::invoke`]:
//!
//! 1. `depends(...)` walks its arguments left to right, depth first, running
//!    each named target or body at most once per run.
//! 2. Any other name is resolved against the builtins (`println`, `target`,
//!    ...) and the targets in the binding. A target called by name is then
//!    recorded as executed so a later `depends` skips it.
//! 3. A name that resolves to nothing is forwarded to the task builder bound
//!    as `ant`. If the engine has no such task either, the original
//!    [`GantError::MissingMethod`] is reported, not the engine's complaint.
//!
//! [`ExecutedSet`] is owned by the driver and passed in by reference, so two
//! drivers never share deduplication state.

use std::collections::HashSet;

use super::builder::TaskBuilder;
use crate::console::Console;
use crate::core::models::{
    ANT, Attributes, Binding, Body, BodyId, DEFAULT_TARGET, Dependency, Target, Value,
};
use crate::core::ports::{TaskError, TaskInvocation};
use crate::error::GantError;

/// The dependency declaration call
pub const DEPENDS: &str = "depends";

/// Bodies already run in the current driver invocation
///
/// A body is recorded before it starts, so a body that fails stays recorded
/// and is not retried, and a cycle stops at its first back edge.
#[derive(Debug, Clone, Default)]
pub struct ExecutedSet {
    bodies: HashSet<BodyId>,
}

impl ExecutedSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a body; returns `false` if it was already recorded
    pub fn insert(&mut self, body: &Body) -> bool {
        self.bodies.insert(body.id())
    }

    /// Number of recorded bodies
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether nothing has run yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// The dispatch object handed to every body
#[derive(Debug)]
pub struct TargetContext<'a> {
    binding: &'a mut Binding,
    executed: &'a mut ExecutedSet,
    console: &'a Console,
    nested: Vec<Vec<TaskInvocation>>,
}

impl<'a> TargetContext<'a> {
    /// Create a context over a driver's binding and executed-set
    pub fn new(
        binding: &'a mut Binding,
        executed: &'a mut ExecutedSet,
        console: &'a Console,
    ) -> Self {
        Self {
            binding,
            executed,
            console,
            nested: Vec::new(),
        }
    }

    /// The binding
    #[must_use]
    pub fn binding(&self) -> &Binding {
        &*self.binding
    }

    /// Bodies run so far
    #[must_use]
    pub fn executed(&self) -> &ExecutedSet {
        &*self.executed
    }

    /// The output channel of this run
    #[must_use]
    pub const fn console(&self) -> &Console {
        self.console
    }

    /// The task builder bound as `ant`
    pub fn ant(&self) -> Result<TaskBuilder, GantError> {
        self.binding
            .task_builder()
            .ok_or_else(|| GantError::MissingVariable(ANT.to_string()))
    }

    /// Look up a variable: the binding first, then engine properties
    pub fn variable(&self, name: &str) -> Result<Value, GantError> {
        if let Ok(value) = self.binding.get(name) {
            return Ok(value.clone());
        }
        self.binding
            .task_builder()
            .and_then(|builder| builder.property(name))
            .map(Value::Str)
            .ok_or_else(|| GantError::MissingVariable(name.to_string()))
    }

    /// Bind a variable
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.binding.set(name, value);
    }

    /// Dispatch a call made by name inside a body
    pub fn invoke(&mut self, name: &str, args: Vec<Value>) -> Result<Value, GantError> {
        if name == DEPENDS {
            return self.process_dependencies(args);
        }

        match self.call_local(name, args.clone()) {
            Ok(value) => {
                if let Some(body) = self.binding.target_body(name).cloned() {
                    self.executed.insert(&body);
                }
                Ok(value)
            },
            Err(GantError::MissingMethod(missing)) if missing == name => {
                self.forward_to_builder(name, args)
            },
            Err(e) => Err(e),
        }
    }

    /// `depends` over script values, converting each argument as it is reached
    ///
    /// Lists are walked item by item, so the items before an invalid one
    /// have already run when it is rejected.
    pub fn process_dependencies(&mut self, args: Vec<Value>) -> Result<Value, GantError> {
        let mut last = Value::Nil;
        for arg in args {
            let result = match arg {
                Value::List(items) => self.process_dependencies(items)?,
                other => self.resolve_dependency(Dependency::try_from(other)?)?,
            };
            if !result.is_nil() {
                last = result;
            }
        }
        Ok(last)
    }

    /// Run each dependency at most once, left to right, depth first
    ///
    /// Returns the last non-nil result, or [`Value::Nil`].
    pub fn depends<I, D>(&mut self, dependencies: I) -> Result<Value, GantError>
    where
        I: IntoIterator<Item = D>,
        D: Into<Dependency>,
    {
        let mut last = Value::Nil;
        for dependency in dependencies {
            let result = self.resolve_dependency(dependency.into())?;
            if !result.is_nil() {
                last = result;
            }
        }
        Ok(last)
    }

    fn resolve_dependency(&mut self, dependency: Dependency) -> Result<Value, GantError> {
        match dependency {
            Dependency::ByBody(body) => self.run_once(&body),
            Dependency::ByName(name) => {
                let body = self
                    .binding
                    .target_body(&name)
                    .cloned()
                    .ok_or(GantError::UnknownDependency(name))?;
                self.run_once(&body)
            },
            Dependency::List(items) => self.depends(items),
        }
    }

    /// Invoke a body unless it already ran in this driver invocation
    pub fn run_once(&mut self, body: &Body) -> Result<Value, GantError> {
        if !self.executed.insert(body) {
            log::trace!("skipping {body}, already executed");
            return Ok(Value::Nil);
        }
        log::trace!("running {body}");
        body.call(self)
    }

    /// Register a target from within a body or the script's top level
    pub fn define_target(&mut self, target: Target) -> Body {
        let body = target.body.clone();
        self.binding.register_target(target);
        body
    }

    /// Print a line through the console
    pub fn println(&self, text: &str) {
        self.console.println(text);
    }

    /// Resolution against builtins and the binding; no task fallback
    fn call_local(&mut self, name: &str, args: Vec<Value>) -> Result<Value, GantError> {
        match name {
            "println" => {
                self.console.println(&join_display(&args));
                Ok(Value::Nil)
            },
            "print" => {
                self.console.print(&join_display(&args));
                Ok(Value::Nil)
            },
            "target" => self.target_builtin(args),
            "setDefaultTarget" => self.set_default_target(args),
            _ => match self.binding.target_body(name).cloned() {
                Some(body) => body.call(self),
                None => Err(GantError::MissingMethod(name.to_string())),
            },
        }
    }

    fn forward_to_builder(&mut self, name: &str, args: Vec<Value>) -> Result<Value, GantError> {
        let Some(builder) = self.binding.task_builder() else {
            return Err(GantError::MissingMethod(name.to_string()));
        };
        log::trace!("{name} is not a target, forwarding to the task builder");
        match builder.invoke(self, name, args) {
            Err(GantError::Task(TaskError::NotFound(task))) if task == name => {
                Err(GantError::MissingMethod(name.to_string()))
            },
            other => other,
        }
    }

    /// `target(name: "n", description: "d") { ... }` or `target(n: "d") { ... }`
    fn target_builtin(&mut self, args: Vec<Value>) -> Result<Value, GantError> {
        let unexpected = || GantError::UnexpectedArgument("target".to_string());
        let mut args = args.into_iter();
        let (Some(Value::Map(header)), Some(Value::Body(body)), None) =
            (args.next(), args.next(), args.next())
        else {
            return Err(unexpected());
        };
        let (name, description) = target_header(&header).ok_or_else(unexpected)?;
        Ok(Value::Body(self.define_target(Target::new(name, description, body))))
    }

    /// `setDefaultTarget(name)` or `setDefaultTarget(body)`
    fn set_default_target(&mut self, args: Vec<Value>) -> Result<Value, GantError> {
        let mut args = args.into_iter();
        let (Some(arg), None) = (args.next(), args.next()) else {
            return Err(GantError::UnexpectedArgument("setDefaultTarget".to_string()));
        };
        let dependency = Dependency::try_from(arg)?;
        let description = format!("Default target is {dependency}.");
        let body = Body::new(move |ctx| ctx.depends([dependency.clone()]));
        Ok(Value::Body(self.define_target(Target::new(DEFAULT_TARGET, description, body))))
    }

    /// Run `body` with task calls collected as nested elements
    pub(crate) fn collect_nested(&mut self, body: &Body) -> Result<Vec<TaskInvocation>, GantError> {
        self.nested.push(Vec::new());
        let result = body.call(self);
        let collected = self.nested.pop().unwrap_or_default();
        result.map(|_| collected)
    }

    /// The nested-element frame being collected, if any
    pub(crate) fn nested_elements(&mut self) -> Option<&mut Vec<TaskInvocation>> {
        self.nested.last_mut()
    }
}

fn target_header(header: &Attributes) -> Option<(String, String)> {
    if let Some(name) = header.get_string("name") {
        return Some((name, header.get_string("description").unwrap_or_default()));
    }
    let mut entries = header.iter();
    match (entries.next(), entries.next()) {
        (Some((name, description)), None) => Some((name.to_string(), description.to_string())),
        _ => None,
    }
}

fn join_display(args: &[Value]) -> String {
    args.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}
