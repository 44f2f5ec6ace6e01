//! In-memory task registry.
//!
//! # Responsibility
//! - Own the ordered task collection for one session.
//! - Provide add/complete/delete/statistics use-cases over it.
//! - Translate user-facing display indices into stable task ids.
//!
//! # Invariants
//! - Insertion order is display order.
//! - Every mutation is all-or-nothing: on `Err` the collection is unchanged.
//! - Ids are unique within the registry.
//! - A completed task is never reverted and its `completed_at` never moves.

use crate::model::task::{Task, TaskId, TaskValidationError, Timestamp};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Answers accepted as "yes" by the delete confirmation prompt.
pub const AFFIRMATIVE_TOKENS: &[&str] = &["y", "yes", "да"];

static INTEGER_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?[0-9]+)").expect("valid integer prefix regex"));

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry error for task use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// New task input failed model validation.
    Validation(TaskValidationError),
    /// Index input has no leading integer.
    NonNumericIndex(String),
    /// Index is below 1 or past the end of the list.
    IndexOutOfRange { index: i64, len: usize },
    /// Target id is no longer present.
    NotFound(TaskId),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NonNumericIndex(input) => write!(f, "`{input}` is not a task number"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "task number {index} is out of range 1..={len}")
            }
            Self::NotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for RegistryError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Result of a completion request that passed index validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompleteOutcome {
    /// Task transitioned to completed; carries the updated task.
    Completed(Task),
    /// Task was already completed; nothing changed.
    AlreadyCompleted(Task),
}

/// Result of a delete request that passed index validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Task was removed; carries the removed task.
    Removed(Task),
    /// User declined; nothing changed.
    Declined,
}

/// User answer to the delete confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Declined,
}

impl Confirmation {
    /// Interprets a free-text answer.
    ///
    /// Matching is case-insensitive against `AFFIRMATIVE_TOKENS`; anything
    /// else, including typos, declines without asking again.
    pub fn from_answer(answer: &str) -> Self {
        let normalized = answer.trim().to_lowercase();
        if AFFIRMATIVE_TOKENS.contains(&normalized.as_str()) {
            Self::Accepted
        } else {
            Self::Declined
        }
    }
}

/// Aggregate counters over the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Rounded completion percentage; `None` when there are no tasks.
    pub progress_percent: Option<u32>,
}

impl Statistics {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        let progress_percent = (total > 0).then(|| rounded_percent(completed, total));
        Self {
            total,
            completed,
            pending: total - completed,
            progress_percent,
        }
    }
}

/// Ordered task collection owned by the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
}

impl TaskRegistry {
    /// Wraps an already loaded collection, keeping its order.
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Gets one task by id.
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.position_of(id).map(|position| &self.tasks[position])
    }

    /// Appends a new pending task.
    ///
    /// # Contract
    /// - Title and description are trimmed.
    /// - Returns the created task, now last in display order.
    ///
    /// # Errors
    /// - `RegistryError::Validation(EmptyTitle)` when the trimmed title is
    ///   empty; the collection is unchanged.
    pub fn add(&mut self, title: &str, description: &str) -> RegistryResult<&Task> {
        let mut task = Task::new(title, description)?;
        while self.position_of(&task.id).is_some() {
            task.id = TaskId::generate();
        }

        info!(
            "event=task_add module=registry status=ok id={} count={}",
            task.id,
            self.tasks.len() + 1
        );
        let position = self.tasks.len();
        self.tasks.push(task);
        Ok(&self.tasks[position])
    }

    /// Resolves a user-typed 1-based display index into a task id.
    ///
    /// The longest leading integer is used and trailing text is ignored, so
    /// `"2abc"` selects task 2.
    ///
    /// # Errors
    /// - `NonNumericIndex` when the input has no leading integer.
    /// - `IndexOutOfRange` when the number is below 1 or above `len()`.
    pub fn resolve(&self, input: &str) -> RegistryResult<TaskId> {
        let index = parse_display_index(input)?;
        let len = self.tasks.len();
        if index < 1 || index > len as i64 {
            debug!(
                "event=index_resolve module=registry status=rejected index={} len={}",
                index, len
            );
            return Err(RegistryError::IndexOutOfRange { index, len });
        }
        Ok(self.tasks[(index - 1) as usize].id.clone())
    }

    /// Marks the task `id` completed with the current time.
    ///
    /// Completing an already completed task is reported through
    /// `CompleteOutcome::AlreadyCompleted` and keeps the original timestamp.
    pub fn complete(&mut self, id: &TaskId) -> RegistryResult<CompleteOutcome> {
        self.complete_at(id, Timestamp::now())
    }

    /// Same as `complete` with an explicit completion time.
    pub fn complete_at(&mut self, id: &TaskId, at: Timestamp) -> RegistryResult<CompleteOutcome> {
        let position = self
            .position_of(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        let task = &mut self.tasks[position];

        if !task.mark_completed(at) {
            info!(
                "event=task_complete module=registry status=noop id={} reason=already_completed",
                id
            );
            return Ok(CompleteOutcome::AlreadyCompleted(task.clone()));
        }

        info!(
            "event=task_complete module=registry status=ok id={} position={}",
            id,
            position + 1
        );
        Ok(CompleteOutcome::Completed(task.clone()))
    }

    /// Removes the task `id` when `confirmation` is accepted.
    ///
    /// Later tasks shift down by one display position; their ids are kept.
    pub fn delete(
        &mut self,
        id: &TaskId,
        confirmation: Confirmation,
    ) -> RegistryResult<DeleteOutcome> {
        let position = self
            .position_of(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        if confirmation == Confirmation::Declined {
            info!("event=task_delete module=registry status=declined id={}", id);
            return Ok(DeleteOutcome::Declined);
        }

        let removed = self.tasks.remove(position);
        info!(
            "event=task_delete module=registry status=ok id={} count={}",
            id,
            self.tasks.len()
        );
        Ok(DeleteOutcome::Removed(removed))
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_tasks(&self.tasks)
    }

    fn position_of(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }
}

fn parse_display_index(input: &str) -> RegistryResult<i64> {
    let captures = INTEGER_PREFIX_RE
        .captures(input)
        .ok_or_else(|| RegistryError::NonNumericIndex(input.trim().to_string()))?;
    let digits = &captures[1];

    // Overflow saturates; any saturated value is out of range anyway.
    Ok(digits.parse::<i64>().unwrap_or(if digits.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

// Half-up rounding in integer arithmetic.
fn rounded_percent(completed: usize, total: usize) -> u32 {
    ((200 * completed + total) / (2 * total)) as u32
}
