//! Run-time services
//!
//! - [`resolver`] - the dispatch object bodies run against, `depends`, and
//!   at-most-once execution
//! - [`builder`] - the task builder proxy with its dry-run trace

pub mod builder;
pub mod resolver;

pub use builder::{TRACE_COLUMN, TaskBuilder, task_header, trace_line};
pub use resolver::{DEPENDS, ExecutedSet, TargetContext};
