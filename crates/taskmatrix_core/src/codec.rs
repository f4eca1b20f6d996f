//! Task wire codec.
//!
//! # Responsibility
//! - Convert tasks to and from the persisted record shape.
//! - Recover per record when a persisted collection is partly corrupt.
//!
//! # Invariants
//! - `deserialize_task(serialize_task(t)) == t` for every valid task.
//! - Decoding never panics; bad input surfaces as `CodecError`.

use crate::model::task::{Category, Priority, Task, TaskId};
use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Persisted record shape. Instants are RFC 3339 text in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub is_complete: bool,
    pub due_date: String,
    pub priority: Priority,
    pub category: Category,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// An instant field holds text that is not RFC 3339.
    InvalidInstant { field: &'static str, value: String },
    /// The record does not have the task shape.
    InvalidRecord(String),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInstant { field, value } => {
                write!(f, "invalid instant `{value}` in field `{field}`")
            }
            Self::InvalidRecord(message) => write!(f, "invalid task record: {message}"),
        }
    }
}

impl Error for CodecError {}

/// Renders an instant with a `Z` suffix and only as many fractional digits
/// as the value needs.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses RFC 3339 text (any offset) into UTC.
///
/// Signed years outside `0000..=9999` (as written by [`format_instant`])
/// go through chrono's relaxed parser.
pub fn parse_instant(field: &'static str, value: &str) -> Result<DateTime<Utc>, CodecError> {
    let text = value.trim();
    DateTime::parse_from_rfc3339(text)
        .map(|instant| instant.with_timezone(&Utc))
        .or_else(|_| text.parse::<DateTime<Utc>>())
        .map_err(|_| CodecError::InvalidInstant {
            field,
            value: value.to_string(),
        })
}

pub fn serialize_task(task: &Task) -> TaskRecord {
    TaskRecord {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        is_complete: task.is_complete,
        due_date: format_instant(task.due_date),
        priority: task.priority,
        category: task.category,
        created_at: format_instant(task.created_at),
        updated_at: format_instant(task.updated_at),
    }
}

pub fn deserialize_task(record: TaskRecord) -> Result<Task, CodecError> {
    let due_date = parse_instant("dueDate", &record.due_date)?;
    let created_at = parse_instant("createdAt", &record.created_at)?;
    let updated_at = parse_instant("updatedAt", &record.updated_at)?;

    Ok(Task {
        id: record.id,
        title: record.title,
        description: record.description,
        is_complete: record.is_complete,
        due_date,
        priority: record.priority,
        category: record.category,
        created_at,
        updated_at,
    })
}

pub fn encode_tasks(tasks: &[Task]) -> Vec<TaskRecord> {
    tasks.iter().map(serialize_task).collect()
}

/// Outcome of decoding a persisted collection.
#[derive(Debug, Default)]
pub struct DecodedTasks {
    pub tasks: Vec<Task>,
    /// Position and reason for every record that was dropped.
    pub skipped: Vec<(usize, CodecError)>,
}

/// Decodes raw JSON records, skipping (and logging) each one that is corrupt.
pub fn decode_records(values: Vec<serde_json::Value>) -> DecodedTasks {
    let mut decoded = DecodedTasks {
        tasks: Vec::with_capacity(values.len()),
        skipped: Vec::new(),
    };

    for (index, value) in values.into_iter().enumerate() {
        let result = serde_json::from_value::<TaskRecord>(value)
            .map_err(|err| CodecError::InvalidRecord(err.to_string()))
            .and_then(deserialize_task);
        match result {
            Ok(task) => decoded.tasks.push(task),
            Err(err) => {
                warn!(
                    "event=record_decode module=codec status=skipped index={} error={}",
                    index, err
                );
                decoded.skipped.push((index, err));
            }
        }
    }

    decoded
}
