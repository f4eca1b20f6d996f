//! Query shapes consumed by derived views.

use crate::model::quadrant::Quadrant;
use crate::model::task::{Category, ParseEnumError, Priority, Task};
use chrono::{DateTime, Utc};
use std::str::FromStr;

/// Filter for list views. Every set field must match (AND semantics).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub is_complete: Option<bool>,
    /// Evaluated against the quadrant at `now`.
    pub quadrant: Option<Quadrant>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task, now: DateTime<Utc>) -> bool {
        if self.category.is_some_and(|category| task.category != category) {
            return false;
        }
        if self.priority.is_some_and(|priority| task.priority != priority) {
            return false;
        }
        if self
            .is_complete
            .is_some_and(|is_complete| task.is_complete != is_complete)
        {
            return false;
        }
        if let Some(quadrant) = self.quadrant {
            if crate::matrix::classify_quadrant(task, now) != quadrant {
                return false;
            }
        }
        true
    }
}

/// Sort key for list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortBy {
    /// Earliest due first.
    DueDate,
    /// High before Medium before Low.
    Priority,
    /// Oldest first.
    CreatedAt,
    /// Case-insensitive alphabetical.
    Title,
}

impl FromStr for TaskSortBy {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "duedate" | "due" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "createdat" | "created" => Ok(Self::CreatedAt),
            "title" => Ok(Self::Title),
            _ => Err(ParseEnumError::new("sort key", value)),
        }
    }
}
