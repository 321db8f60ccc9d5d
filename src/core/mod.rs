//! Core of the target-graph execution engine
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Target, Body, Binding, Value, Verbosity)
//! - `services/` - The resolver and the task builder proxy
//! - `ports/` - The task engine interface the core delegates real work to

pub mod models;
pub mod ports;
pub mod services;
