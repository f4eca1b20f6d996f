//! Core domain logic for TaskMatrix.
//! This crate is the single source of truth for task invariants, the
//! urgency/importance classification and the persisted collection format.

pub mod clock;
pub mod codec;
pub mod config;
pub mod dates;
pub mod logging;
pub mod matrix;
pub mod model;
pub mod stats;
pub mod storage;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{deserialize_task, serialize_task, CodecError, TaskRecord};
pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use matrix::{classify_quadrant, enhance, group_by_quadrant, QuadrantGroups};
pub use model::quadrant::{ClassifiedTask, Quadrant};
pub use model::query::{TaskFilter, TaskSortBy};
pub use model::task::{Category, NewTask, ParseEnumError, Priority, Task, TaskId, TaskPatch};
pub use stats::{percentage, stats_of, TaskStats};
pub use storage::{
    KeyValueStore, MemoryKvStore, SqliteKvStore, Storage, StorageError, StorageResult,
};
pub use store::{SubscriptionId, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
