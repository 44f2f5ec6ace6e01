//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted by the store.
//! - Provide the completion transition and model-level validation.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is non-empty after trimming.
//! - `completed_at` is present exactly when `completed` is true, and once set
//!   it is never overwritten.
//! - `created_at` never changes after construction.

use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Locale-style display format used both on screen and on disk.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

// Accepted on read only; writes always use `DISPLAY_TIMESTAMP_FORMAT`.
const ISO_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const US_TIMESTAMP_FORMAT: &str = "%m/%d/%Y, %I:%M:%S %p";

/// Stable identifier of one task.
///
/// Stored as an opaque string so ids written by older data files keep
/// loading; new ids are random v4 UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing identifier, e.g. one read from disk.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creation or completion time of a task.
///
/// Times captured by this program are local wall-clock values with
/// whole-second precision, written in `DISPLAY_TIMESTAMP_FORMAT`. Strings
/// read from disk in an unrecognised locale format are kept verbatim so
/// re-saving a file never loses them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Timestamp {
    Parsed(NaiveDateTime),
    /// Display string in a format this program does not parse.
    Raw(String),
}

impl Timestamp {
    /// Captures the current local time.
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    /// Builds a timestamp, dropping sub-second precision.
    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self::Parsed(value.with_nanosecond(0).unwrap_or(value))
    }

    /// Returns the structured time, or `None` for a verbatim string.
    pub fn as_naive(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Parsed(value) => Some(*value),
            Self::Raw(_) => None,
        }
    }

    /// Parses the display form, RFC 3339, US locale form, or ISO local form.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, DISPLAY_TIMESTAMP_FORMAT) {
            return Some(Self::from_naive(parsed));
        }
        if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(Self::from_naive(parsed.with_timezone(&Local).naive_local()));
        }
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, US_TIMESTAMP_FORMAT) {
            return Some(Self::from_naive(parsed));
        }
        NaiveDateTime::parse_from_str(trimmed, ISO_TIMESTAMP_FORMAT)
            .ok()
            .map(Self::from_naive)
    }

    /// Parses `value` when possible, otherwise keeps it as `Raw`.
    pub fn from_display(value: impl Into<String>) -> Self {
        let value = value.into();
        Self::parse(&value).unwrap_or(Self::Raw(value))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parsed(value) => write!(f, "{}", value.format(DISPLAY_TIMESTAMP_FORMAT)),
            Self::Raw(value) => f.write_str(value),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Timestamp::from_display)
    }
}

/// Model-level validation failures for `Task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
    /// Identifier is empty after trimming.
    EmptyId,
    /// `completed` and `completed_at` disagree.
    CompletionTimestampMismatch { id: TaskId },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::EmptyId => write!(f, "task id cannot be empty"),
            Self::CompletionTimestampMismatch { id } => write!(
                f,
                "task {id}: completedAt must be set exactly when completed is true"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Free-form details; empty when the user skipped it.
    pub description: String,
    pub completed: bool,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

impl Task {
    /// Creates a pending task with a generated id and the current time.
    ///
    /// Title and description are trimmed.
    ///
    /// # Errors
    /// - `TaskValidationError::EmptyTitle` when the trimmed title is empty.
    pub fn new(
        title: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Result<Self, TaskValidationError> {
        Self::with_id(TaskId::generate(), title, description, Timestamp::now())
    }

    /// Creates a pending task with caller-provided identity and creation time.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(
        id: TaskId,
        title: impl AsRef<str>,
        description: impl AsRef<str>,
        created_at: Timestamp,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            title: title.as_ref().trim().to_string(),
            description: description.as_ref().trim().to_string(),
            completed: false,
            created_at,
            completed_at: None,
        };
        task.validate()?;
        Ok(task)
    }

    /// Marks the task completed at `at`.
    ///
    /// Returns `false` and leaves the task untouched when it was already
    /// completed, so the first `completed_at` is preserved.
    pub fn mark_completed(&mut self, at: Timestamp) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        self.completed_at = Some(at);
        true
    }

    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// Checks model invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if self.completed != self.completed_at.is_some() {
            return Err(TaskValidationError::CompletionTimestampMismatch {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// Wire shape accepted on read; converted into `Task` through validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    completed: bool,
    created_at: Timestamp,
    #[serde(default)]
    completed_at: Option<Timestamp>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let task = Task {
            id: record.id,
            title: record.title,
            description: record.description,
            completed: record.completed,
            created_at: record.created_at,
            completed_at: record.completed_at,
        };
        task.validate()?;
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskId, Timestamp};
    use chrono::NaiveDate;

    fn fixed(hour: u32, minute: u32, second: u32) -> Timestamp {
        let naive = NaiveDate::from_ymd_opt(2026, 2, 13)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .expect("valid fixed date");
        Timestamp::from_naive(naive)
    }

    #[test]
    fn timestamp_display_uses_locale_style() {
        assert_eq!(fixed(9, 5, 7).to_string(), "13.02.2026, 09:05:07");
    }

    #[test]
    fn timestamp_parse_accepts_display_iso_and_us_forms() {
        let expected = fixed(14, 3, 11);
        assert_eq!(Timestamp::parse("13.02.2026, 14:03:11"), Some(expected.clone()));
        assert_eq!(Timestamp::parse("2026-02-13T14:03:11"), Some(expected.clone()));
        assert_eq!(Timestamp::parse("2/13/2026, 2:03:11 PM"), Some(expected));
        assert_eq!(Timestamp::parse("not a date"), None);
    }

    #[test]
    fn timestamp_now_has_no_subsecond_part() {
        use chrono::Timelike;
        let now = Timestamp::now().as_naive().expect("now is structured");
        assert_eq!(now.nanosecond(), 0);
    }

    #[test]
    fn from_display_keeps_unrecognised_strings_verbatim() {
        let kept = Timestamp::from_display("2026/2/13 14:03:11");
        assert_eq!(kept, Timestamp::Raw("2026/2/13 14:03:11".to_string()));
        assert_eq!(kept.to_string(), "2026/2/13 14:03:11");
        assert_eq!(kept.as_naive(), None);

        assert_eq!(
            Timestamp::from_display("13.02.2026, 14:03:11"),
            fixed(14, 3, 11)
        );
    }

    #[test]
    fn mark_completed_only_sets_timestamp_once() {
        let mut task =
            Task::with_id(TaskId::new("t-1"), "write docs", "", fixed(8, 0, 0)).unwrap();

        assert!(task.mark_completed(fixed(9, 0, 0)));
        assert!(!task.mark_completed(fixed(10, 0, 0)));
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(fixed(9, 0, 0)));
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(TaskId::generate(), TaskId::generate());
    }
}
