//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical task record used by registry, store and presenter.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard removal; there are no tombstones.

pub mod task;
