//! Task store contracts and JSON file implementation.
//!
//! # Responsibility
//! - Read and write the whole task collection in one call.
//! - Keep file format details inside the persistence boundary.
//!
//! # Invariants
//! - A missing, empty or whitespace-only file loads as an empty collection.
//! - Write paths call `Task::validate()` and reject duplicate ids before
//!   touching the file.
//! - Read paths reject invalid persisted state instead of masking it.
//! - The backing file is opened and closed per call, never held open.

use crate::model::task::{Task, TaskId, TaskValidationError};
use log::{error, info, warn};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for task load/save operations.
#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Serialize(serde_json::Error),
    Validation(TaskValidationError),
    DuplicateId(TaskId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "invalid task data in {}: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to encode tasks: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "duplicate task id: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Persistence interface for the ordered task collection.
pub trait TaskStore {
    /// Returns the persisted collection in display order.
    fn load(&self) -> StoreResult<Vec<Task>>;
    /// Replaces the persisted collection with `tasks`.
    fn save(&self, tasks: &[Task]) -> StoreResult<()>;
}

/// Task store backed by one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileTaskStore {
    path: PathBuf,
}

impl JsonFileTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write_atomically(&self, payload: &str) -> StoreResult<()> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(parent).map_err(|err| self.io_error(err))?;
        staged
            .write_all(payload.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|err| self.io_error(err))?;
        // The replacement inherits the mode of the file it overwrites.
        match std::fs::metadata(&self.path) {
            Ok(existing) => staged
                .as_file()
                .set_permissions(existing.permissions())
                .map_err(|err| self.io_error(err))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(self.io_error(err)),
        }
        staged
            .persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;
        Ok(())
    }
}

impl TaskStore for JsonFileTaskStore {
    fn load(&self) -> StoreResult<Vec<Task>> {
        let started_at = Instant::now();

        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("event=store_load module=store status=ok source=missing count=0");
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error_code=read_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(self.io_error(err));
            }
        };

        if raw.trim().is_empty() {
            info!("event=store_load module=store status=ok source=empty count=0");
            return Ok(Vec::new());
        }

        let tasks: Vec<Task> = serde_json::from_str(&raw).map_err(|source| {
            warn!(
                "event=store_load module=store status=error duration_ms={} error_code=parse_failed line={} column={}",
                started_at.elapsed().as_millis(),
                source.line(),
                source.column()
            );
            StoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        ensure_unique_ids(&tasks)?;

        info!(
            "event=store_load module=store status=ok source=file count={} duration_ms={}",
            tasks.len(),
            started_at.elapsed().as_millis()
        );
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> StoreResult<()> {
        let started_at = Instant::now();

        for task in tasks {
            task.validate()?;
        }
        ensure_unique_ids(tasks)?;
        let payload = serde_json::to_string_pretty(tasks)?;

        match self.write_atomically(&payload) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok count={} bytes={} duration_ms={}",
                    tasks.len(),
                    payload.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error duration_ms={} error_code=write_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

/// In-process store used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RefCell<Vec<Task>>,
    save_count: Cell<usize>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `tasks`.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RefCell::new(tasks),
            save_count: Cell::new(0),
        }
    }

    /// Returns a copy of the last saved collection.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }
}

impl TaskStore for MemoryTaskStore {
    fn load(&self) -> StoreResult<Vec<Task>> {
        Ok(self.tasks.borrow().clone())
    }

    fn save(&self, tasks: &[Task]) -> StoreResult<()> {
        for task in tasks {
            task.validate()?;
        }
        ensure_unique_ids(tasks)?;
        *self.tasks.borrow_mut() = tasks.to_vec();
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}

impl<S: TaskStore + ?Sized> TaskStore for &S {
    fn load(&self) -> StoreResult<Vec<Task>> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> StoreResult<()> {
        (**self).save(tasks)
    }
}

fn ensure_unique_ids(tasks: &[Task]) -> StoreResult<()> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen.insert(&task.id) {
            return Err(StoreError::DuplicateId(task.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_unique_ids, StoreError};
    use crate::model::task::{Task, TaskId, Timestamp};

    #[test]
    fn ensure_unique_ids_reports_first_duplicate() {
        let created_at = Timestamp::now();
        let tasks = vec![
            Task::with_id(TaskId::new("a"), "one", "", created_at.clone()).unwrap(),
            Task::with_id(TaskId::new("b"), "two", "", created_at.clone()).unwrap(),
            Task::with_id(TaskId::new("a"), "three", "", created_at).unwrap(),
        ];

        let err = ensure_unique_ids(&tasks).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(id) if id.as_str() == "a"));
    }
}
