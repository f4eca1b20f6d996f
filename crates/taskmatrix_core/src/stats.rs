//! Aggregations over task collections.
//!
//! # Responsibility
//! - Compute grouped counts, percentages and time-window lists.
//!
//! # Invariants
//! - `by_category` and `by_priority` count every task.
//! - `by_quadrant` counts incomplete tasks only.
//! - Time-window lists are ordered by ascending due date, ties keep input order.

use crate::matrix::group_by_quadrant;
use crate::model::quadrant::Quadrant;
use crate::model::query::TaskSortBy;
use crate::model::task::{Category, Priority, Task};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Look-ahead window for [`upcoming`].
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Snapshot of collection-wide counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub completion_percentage: u32,
    /// Only categories that occur are present.
    pub by_category: BTreeMap<Category, usize>,
    /// Only priorities that occur are present.
    pub by_priority: BTreeMap<Priority, usize>,
    /// All four quadrants, incomplete tasks only.
    pub by_quadrant: BTreeMap<Quadrant, usize>,
}

impl TaskStats {
    pub fn category_count(&self, category: Category) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }

    pub fn priority_count(&self, priority: Priority) -> usize {
        self.by_priority.get(&priority).copied().unwrap_or(0)
    }

    pub fn quadrant_count(&self, quadrant: Quadrant) -> usize {
        self.by_quadrant.get(&quadrant).copied().unwrap_or(0)
    }
}

/// Rounded percentage; 0 when `total` is 0.
pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

pub fn stats_of(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.is_complete).count();

    let mut by_category = BTreeMap::new();
    let mut by_priority = BTreeMap::new();
    for task in tasks {
        *by_category.entry(task.category).or_insert(0) += 1;
        *by_priority.entry(task.priority).or_insert(0) += 1;
    }

    let matrix = group_by_quadrant(tasks.iter().filter(|task| !task.is_complete), now);
    let by_quadrant = matrix
        .iter()
        .map(|(quadrant, bucket)| (quadrant, bucket.len()))
        .collect();

    TaskStats {
        total,
        completed,
        completion_percentage: percentage(completed, total),
        by_category,
        by_priority,
        by_quadrant,
    }
}

/// Incomplete tasks due in `[now, now + 7 days]`.
pub fn upcoming(tasks: &[Task], now: DateTime<Utc>) -> Vec<&Task> {
    let horizon = now + Duration::days(UPCOMING_WINDOW_DAYS);
    by_due_date(
        tasks
            .iter()
            .filter(|task| !task.is_complete && task.due_date >= now && task.due_date <= horizon),
    )
}

/// Incomplete tasks due strictly before `now`.
pub fn overdue(tasks: &[Task], now: DateTime<Utc>) -> Vec<&Task> {
    by_due_date(
        tasks
            .iter()
            .filter(|task| !task.is_complete && task.due_date < now),
    )
}

pub fn completion_percentage_for_category(tasks: &[Task], category: Category) -> u32 {
    let (done, total) = tasks
        .iter()
        .filter(|task| task.category == category)
        .fold((0, 0), |(done, total), task| {
            (done + usize::from(task.is_complete), total + 1)
        });
    percentage(done, total)
}

/// Stable sort of a task view.
pub fn sort_tasks(tasks: &mut [&Task], by: TaskSortBy) {
    match by {
        TaskSortBy::DueDate => tasks.sort_by_key(|task| task.due_date),
        TaskSortBy::Priority => tasks.sort_by_key(|task| task.priority.rank()),
        TaskSortBy::CreatedAt => tasks.sort_by_key(|task| task.created_at),
        TaskSortBy::Title => tasks.sort_by_cached_key(|task| task.title.to_lowercase()),
    }
}

fn by_due_date<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<&'a Task> {
    let mut selected: Vec<&Task> = tasks.collect();
    selected.sort_by_key(|task| task.due_date);
    selected
}
