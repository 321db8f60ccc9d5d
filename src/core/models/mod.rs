//! Domain models for gant
//!
//! Pure data structures shared by the resolver, the task builder and the
//! script evaluator.
//!
//! - [`Target`] / [`Body`] - a named unit of work and its callable
//! - [`Dependency`] - what `depends` accepts
//! - [`Binding`] - the script's name to value mapping
//! - [`Value`] / [`Attributes`] - script values and ordered attribute maps
//! - [`Verbosity`] - how much of the trace is shown

mod binding;
mod dependency;
mod target;
mod value;
mod verbosity;

pub use binding::{ANT, ANT_ALIAS, Binding, DEFAULT_TARGET, TargetInfo};
pub use dependency::Dependency;
pub use target::{Body, BodyId, Target};
pub use value::{Attributes, Value};
pub use verbosity::Verbosity;
