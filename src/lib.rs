//! gant - A scripted build tool
//!
//! A build script registers named targets. Asked to achieve a target, the
//! [`Gant`] driver runs its body through a [`TargetContext`], which resolves
//! `depends` so that every target runs at most once, and forwards every name
//! that is not a target to the task builder bound as `ant`. In a dry run the
//! builder traces task calls instead of executing them.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod config;
pub mod console;
pub mod core;
pub mod driver;
pub mod error;
pub mod host;
pub mod output;
pub mod paths;
pub mod script;
pub mod state;

pub use console::{Captured, Console};
pub use crate::core::models::{
    Attributes, Binding, Body, Dependency, Target, TargetInfo, Value, Verbosity,
};
pub use crate::core::ports::{TaskEngine, TaskError, TaskInvocation};
pub use crate::core::services::{ExecutedSet, TargetContext, TaskBuilder};
pub use driver::Gant;
pub use error::{EXIT_FAILURE, EXIT_SCRIPT_ERROR, EXIT_SUCCESS, EXIT_UNKNOWN_TARGET, GantError};
pub use host::{GantTask, HostError};
pub use script::{Script, ScriptError};
