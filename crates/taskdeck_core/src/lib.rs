//! Core logic for TaskDeck, a single-user interactive task list.
//! This crate is the single source of truth for task invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod present;
pub mod repo;
pub mod service;
pub mod session;

pub use config::{AppConfig, ConfigError, DEFAULT_LOG_DIR, DEFAULT_TASKS_FILE};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Task, TaskId, TaskValidationError, Timestamp};
pub use present::{render_statistics, render_tasks};
pub use repo::task_store::{
    JsonFileTaskStore, MemoryTaskStore, StoreError, StoreResult, TaskStore,
};
pub use service::task_registry::{
    CompleteOutcome, Confirmation, DeleteOutcome, RegistryError, RegistryResult, Statistics,
    TaskRegistry, AFFIRMATIVE_TOKENS,
};
pub use session::{MenuChoice, Session, SessionError, SessionResult, SessionState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
