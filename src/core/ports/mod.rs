//! Port traits (interfaces) for external collaborators
//!
//! The core assembles task calls; performing them is delegated through the
//! [`TaskEngine`] port. Implementations live in the `adapters` module, and
//! tests substitute recording mocks.

mod task_engine;

pub use task_engine::{TASK_NOT_FOUND_PREFIX, TaskEngine, TaskError, TaskInvocation};
