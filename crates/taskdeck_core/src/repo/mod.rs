//! Persistence boundary for the task collection.
//!
//! # Responsibility
//! - Define the load/save contract used by the session layer.
//! - Isolate file format and filesystem details from registry logic.
//!
//! # Invariants
//! - Store APIs return error values; they never panic or exit the process.
//! - A missing or empty backing file is not an error.

pub mod task_store;
