//! Targets and their bodies
//!
//! A [`Target`] is a named, parameterless unit of work registered by a build
//! script. Its [`Body`] is invoked through a
//! [`TargetContext`](crate::core::services::TargetContext), which offers
//! `depends`, the task builder, and variable lookup.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::value::Value;
use crate::core::services::TargetContext;
use crate::error::GantError;

static NEXT_BODY_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a body, stable across clones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type BodyFn = dyn Fn(&mut TargetContext<'_>) -> Result<Value, GantError>;

/// A callable attached to a target or passed as a nested task body
///
/// Clones share both the callable and the identity, so the executed-set
/// recognises a body however many times it is copied around the binding.
#[derive(Clone)]
pub struct Body {
    id: BodyId,
    func: Rc<BodyFn>,
}

impl Body {
    /// Wrap a closure as a body with a fresh identity
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&mut TargetContext<'_>) -> Result<Value, GantError> + 'static,
    {
        Self {
            id: BodyId(NEXT_BODY_ID.fetch_add(1, Ordering::Relaxed)),
            func: Rc::new(func),
        }
    }

    /// This body's identity
    #[must_use]
    pub const fn id(&self) -> BodyId {
        self.id
    }

    /// Invoke the body unconditionally
    ///
    /// Deduplication is the resolver's job; see
    /// [`TargetContext::run_once`](crate::core::services::TargetContext::run_once).
    pub fn call(&self, ctx: &mut TargetContext<'_>) -> Result<Value, GantError> {
        (self.func)(ctx)
    }
}

impl PartialEq for Body {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Body {}

impl Hash for Body {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Body").field(&self.id).finish()
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<closure {}>", self.id)
    }
}

/// A registered target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Unique name within a run
    pub name: String,
    /// Human-readable description (may be empty)
    pub description: String,
    /// The work to do
    pub body: Body,
}

impl Target {
    /// Create a new target
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, body: Body) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            body,
        }
    }
}
