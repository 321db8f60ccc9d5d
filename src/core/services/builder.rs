//! Task builder proxy
//!
//! Every task call from a script (`ant.copy(...)`, or an unqualified name
//! the resolver could not place) arrives at [`TaskBuilder::invoke`]. In a
//! dry run the call is traced through the console instead of executed;
//! otherwise it is assembled into a [`TaskInvocation`] and handed to the
//! task engine.
//!
//! # Trace format
//!
//! ```text
//!     [copy] file : 'x' , todir : 'y'
//! ```
//!
//! The bracketed task name is right-aligned in a [`TRACE_COLUMN`]-wide
//! column, followed by one space and the attributes in call order.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::resolver::TargetContext;
use crate::core::models::{Attributes, Body, Value, Verbosity};
use crate::core::ports::{TaskEngine, TaskError, TaskInvocation};
use crate::error::GantError;
use crate::state;

/// Width of the column holding the bracketed task name
pub const TRACE_COLUMN: usize = 10;

/// Proxy forwarding task calls to a [`TaskEngine`]
///
/// Clones share the engine; `ant` and `Ant` in a binding are clones of one
/// builder.
#[derive(Clone)]
pub struct TaskBuilder {
    engine: Rc<RefCell<dyn TaskEngine>>,
}

impl fmt::Debug for TaskBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskBuilder").finish_non_exhaustive()
    }
}

impl PartialEq for TaskBuilder {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl TaskBuilder {
    /// Create a builder owning `engine`
    pub fn new(engine: impl TaskEngine + 'static) -> Self {
        Self {
            engine: Rc::new(RefCell::new(engine)),
        }
    }

    /// Whether both handles proxy the same engine instance
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.engine, &other.engine)
    }

    /// Engine-level property, if the engine defines it
    #[must_use]
    pub fn property(&self, name: &str) -> Option<String> {
        self.engine.try_borrow().ok().and_then(|engine| engine.property(name))
    }

    /// Forward a named task call
    ///
    /// `args` holds an attribute map, a nested body, or a map followed by a
    /// body. Anything else fails with [`GantError::UnexpectedArgument`].
    pub fn invoke(
        &self,
        ctx: &mut TargetContext<'_>,
        name: &str,
        args: Vec<Value>,
    ) -> Result<Value, GantError> {
        let call = TaskCall::parse(name, args)?;

        if state::dry_run() {
            if state::verbosity() > Verbosity::Silent {
                ctx.console().print(&trace_line(name, call.attributes.as_ref()));
                if let Some(body) = &call.body {
                    body.call(ctx)?;
                }
            }
            return Ok(Value::Nil);
        }

        let children = match &call.body {
            Some(body) => ctx.collect_nested(body)?,
            None => Vec::new(),
        };
        let invocation = TaskInvocation {
            name: name.to_string(),
            attributes: call.attributes.unwrap_or_default(),
            children,
        };

        if let Some(parent) = ctx.nested_elements() {
            log::trace!("collecting nested element {name}");
            parent.push(invocation);
            return Ok(Value::Nil);
        }

        log::debug!("executing task {name}");
        let result = self.engine.borrow_mut().execute(&invocation, ctx.console());
        match result {
            // An unknown nested element is an unresolved name in the body
            Err(TaskError::NotFound(element))
                if element != invocation.name && invocation.has_element(&element) =>
            {
                Err(GantError::MissingMethod(element))
            },
            other => Ok(other?),
        }
    }
}

/// A task call's arguments, validated
#[derive(Debug)]
struct TaskCall {
    attributes: Option<Attributes>,
    body: Option<Body>,
}

impl TaskCall {
    fn parse(name: &str, args: Vec<Value>) -> Result<Self, GantError> {
        let unexpected = || GantError::UnexpectedArgument(name.to_string());
        let mut args = args.into_iter();
        match (args.next(), args.next(), args.next()) {
            (None, _, _) => Ok(Self {
                attributes: Some(Attributes::new()),
                body: None,
            }),
            (Some(Value::Map(attributes)), None, None) => Ok(Self {
                attributes: Some(attributes),
                body: None,
            }),
            (Some(Value::Map(attributes)), Some(Value::Body(body)), None) => Ok(Self {
                attributes: Some(attributes),
                body: Some(body),
            }),
            (Some(Value::Body(body)), None, None) => Ok(Self {
                attributes: None,
                body: Some(body),
            }),
            _ => Err(unexpected()),
        }
    }
}

/// The bracketed, right-aligned task name that starts every task line
#[must_use]
pub fn task_header(name: &str) -> String {
    format!("{:>width$} ", format!("[{name}]"), width = TRACE_COLUMN)
}

/// Render the dry-run trace line for a task call, newline included
#[must_use]
pub fn trace_line(name: &str, attributes: Option<&Attributes>) -> String {
    let mut line = task_header(name);
    if let Some(attributes) = attributes {
        let rendered: Vec<String> =
            attributes.iter().map(|(key, value)| format!("{key} : '{value}'")).collect();
        line.push_str(&rendered.join(" , "));
    }
    line.push('\n');
    line
}
