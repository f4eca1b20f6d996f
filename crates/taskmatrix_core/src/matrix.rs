//! Eisenhower matrix classification.
//!
//! # Responsibility
//! - Decide urgency and importance for one task at one instant.
//! - Partition task sequences into quadrant buckets.
//!
//! # Invariants
//! - Every function is pure in `(task, now)`.
//! - Bucket contents keep the relative order of the input.

use crate::model::quadrant::{ClassifiedTask, Quadrant};
use crate::model::task::{Priority, Task};
use chrono::{DateTime, Duration, Utc};

/// Due window (inclusive) that makes a future task urgent.
pub const URGENT_WINDOW_HOURS: i64 = 48;

/// High and Medium priorities are important; Low never is.
pub fn is_important(task: &Task) -> bool {
    matches!(task.priority, Priority::High | Priority::Medium)
}

/// Overdue tasks are always urgent; future tasks are urgent when due within
/// [`URGENT_WINDOW_HOURS`].
pub fn is_urgent(task: &Task, now: DateTime<Utc>) -> bool {
    let remaining = task.due_date - now;
    let overdue = remaining < Duration::zero();
    let due_soon =
        remaining >= Duration::zero() && remaining <= Duration::hours(URGENT_WINDOW_HOURS);
    overdue || due_soon
}

pub fn quadrant_for(is_urgent: bool, is_important: bool) -> Quadrant {
    match (is_urgent, is_important) {
        (true, true) => Quadrant::UrgentImportant,
        (false, true) => Quadrant::NotUrgentImportant,
        (true, false) => Quadrant::UrgentNotImportant,
        (false, false) => Quadrant::NotUrgentNotImportant,
    }
}

pub fn classify_quadrant(task: &Task, now: DateTime<Utc>) -> Quadrant {
    quadrant_for(is_urgent(task, now), is_important(task))
}

pub fn enhance(task: &Task, now: DateTime<Utc>) -> ClassifiedTask {
    let is_urgent = is_urgent(task, now);
    let is_important = is_important(task);
    ClassifiedTask {
        task: task.clone(),
        quadrant: quadrant_for(is_urgent, is_important),
        is_urgent,
        is_important,
    }
}

/// Four quadrant buckets, always all present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuadrantGroups {
    buckets: [Vec<ClassifiedTask>; 4],
}

impl QuadrantGroups {
    pub fn get(&self, quadrant: Quadrant) -> &[ClassifiedTask] {
        &self.buckets[quadrant.index()]
    }

    pub fn count(&self, quadrant: Quadrant) -> usize {
        self.buckets[quadrant.index()].len()
    }

    /// Total tasks across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Buckets in matrix order, Q1 through Q4.
    pub fn iter(&self) -> impl Iterator<Item = (Quadrant, &[ClassifiedTask])> {
        Quadrant::ALL
            .into_iter()
            .map(move |quadrant| (quadrant, self.get(quadrant)))
    }

    /// Orders every bucket with [`sort_in_quadrant`].
    pub fn sorted(mut self) -> Self {
        for bucket in &mut self.buckets {
            sort_in_quadrant(bucket);
        }
        self
    }
}

/// Classifies every task. Callers pre-filter completed tasks when needed.
pub fn group_by_quadrant<'a, I>(tasks: I, now: DateTime<Utc>) -> QuadrantGroups
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut groups = QuadrantGroups::default();
    for task in tasks {
        let classified = enhance(task, now);
        groups.buckets[classified.quadrant.index()].push(classified);
    }
    groups
}

/// Priority rank first, then earliest due date.
pub fn sort_in_quadrant(tasks: &mut [ClassifiedTask]) {
    tasks.sort_by(|a, b| {
        a.task
            .priority
            .rank()
            .cmp(&b.task.priority.rank())
            .then_with(|| a.task.due_date.cmp(&b.task.due_date))
    });
}
