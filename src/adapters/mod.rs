//! Adapter implementations for port traits
//!
//! - `local/` - task engine performing file, property and exec tasks in a
//!   base directory

pub mod local;

pub use local::{FileSet, LocalTaskEngine};
