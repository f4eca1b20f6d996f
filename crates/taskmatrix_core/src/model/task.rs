//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record owned by the store.
//! - Define input shapes for creation (`NewTask`) and partial edits
//!   (`TaskPatch`).
//!
//! # Invariants
//! - `id` is stable and never reassigned once a task exists.
//! - `created_at` never changes after creation.
//! - `updated_at >= created_at` for every task produced by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque task identifier.
///
/// Store-created tasks use UUID v4 text; imported tasks keep whatever id the
/// caller supplied.
pub type TaskId = String;

/// Returns a fresh task id.
pub fn generate_task_id() -> TaskId {
    Uuid::new_v4().to_string()
}

/// Task priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Sort rank: lower is more pressing.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Task category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Work,
    Personal,
    Finance,
    Health,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Finance,
        Category::Health,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Finance => "Finance",
            Self::Health => "Health",
            Self::Other => "Other",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ParseEnumError::new("priority", value)),
        }
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(Self::Work),
            "personal" => Ok(Self::Personal),
            "finance" => Ok(Self::Finance),
            "health" => Ok(Self::Health),
            "other" => Ok(Self::Other),
            _ => Err(ParseEnumError::new("category", value)),
        }
    }
}

/// Error returned when text does not name a known enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl Display for ParseEnumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl Error for ParseEnumError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub is_complete: bool,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub category: Category,
    /// Set once by the store at creation.
    pub created_at: DateTime<Utc>,
    /// Bumped by the store on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Materializes a new task from creation input.
    ///
    /// # Invariants
    /// - `created_at == updated_at == now`.
    pub fn create(id: TaskId, data: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: data.title,
            description: data.description,
            is_complete: data.is_complete,
            due_date: data.due_date,
            priority: data.priority,
            category: data.category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges every provided patch field over this task.
    ///
    /// Does not touch `updated_at`; the store decides the timestamp.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(is_complete) = patch.is_complete {
            self.is_complete = is_complete;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
    }

    /// Sets `updated_at` to `now`, clamped so it never precedes `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// Creation input: a task without id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub is_complete: bool,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub category: Category,
}

impl NewTask {
    /// Incomplete task with an empty description.
    pub fn new(
        title: impl Into<String>,
        due_date: DateTime<Utc>,
        priority: Priority,
        category: Category,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            is_complete: false,
            due_date,
            priority,
            category,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Partial edit. `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_complete: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, NewTask, Priority, Task, TaskPatch};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn parses_enum_text_case_insensitively() {
        assert_eq!(" HIGH ".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("finance".parse::<Category>().unwrap(), Category::Finance);

        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err.to_string(), "unknown priority `urgent`");
    }

    #[test]
    fn apply_merges_only_provided_fields() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut task = Task::create(
            "t-1".to_string(),
            NewTask::new("draft", now, Priority::Low, Category::Work).with_description("notes"),
            now,
        );

        task.apply(TaskPatch {
            title: Some("final".to_string()),
            priority: Some(Priority::High),
            ..TaskPatch::default()
        });

        assert_eq!(task.title, "final");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.description, "notes");
        assert_eq!(task.category, Category::Work);
        assert_eq!(task.updated_at, now);
    }

    #[test]
    fn touch_never_moves_before_creation() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut task = Task::create(
            "t-1".to_string(),
            NewTask::new("a", now, Priority::Low, Category::Other),
            now,
        );

        task.touch(now - Duration::hours(1));
        assert_eq!(task.updated_at, task.created_at);

        task.touch(now + Duration::hours(1));
        assert_eq!(task.updated_at, now + Duration::hours(1));
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(TaskPatch::default().is_empty());
        let patch = TaskPatch {
            is_complete: Some(true),
            ..TaskPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
