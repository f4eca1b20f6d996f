//! Domain model for tasks and their derived classifications.
//!
//! # Responsibility
//! - Define canonical data structures used by the store and views.
//! - Keep derived shapes (`ClassifiedTask`) separate from stored ones.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Quadrants are computed on read and never stored on `Task`.

pub mod quadrant;
pub mod query;
pub mod task;
