//! Core use-case services.
//!
//! # Responsibility
//! - Apply task mutations to the in-memory collection.
//! - Keep the interaction loop decoupled from collection details.

pub mod task_registry;
