//! Reactive task store.
//!
//! # Responsibility
//! - Own the task collection and every mutation of it.
//! - Notify subscribers after each completed mutation.
//! - Schedule debounced write-behind persistence.
//! - Serve derived views computed from the current snapshot at read time.
//!
//! # Invariants
//! - The collection is only reachable immutably from outside the store.
//! - Each effective mutation bumps `revision`, re-arms the persistence
//!   deadline and notifies subscribers exactly once.
//! - Persistence failures never roll back or interrupt in-memory state.
//! - `updated_at >= created_at` for every task the store creates or edits.

mod debounce;

pub use debounce::Debouncer;

use crate::clock::{Clock, SystemClock};
use crate::codec::{decode_records, encode_tasks};
use crate::config::StoreConfig;
use crate::matrix::{group_by_quadrant, QuadrantGroups};
use crate::model::query::{TaskFilter, TaskSortBy};
use crate::model::task::{generate_task_id, Category, NewTask, Task, TaskPatch};
use crate::stats::{self, TaskStats};
use crate::storage::{KeyValueStore, Storage};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashSet;

/// Handle returned by [`TaskStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&[Task])>;

/// Session-scoped task store.
///
/// Construct one per session and pass it to consumers explicitly. Dropping
/// the store flushes any pending write.
pub struct TaskStore<S: KeyValueStore, C: Clock = SystemClock> {
    storage: Storage<S>,
    clock: C,
    config: StoreConfig,
    tasks: Vec<Task>,
    persist: Debouncer,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    revision: u64,
}

impl<S: KeyValueStore> TaskStore<S, SystemClock> {
    /// Opens a store on the wall clock with default settings.
    pub fn with_defaults(backend: S) -> Self {
        Self::open(backend, SystemClock, StoreConfig::default())
    }
}

impl<S: KeyValueStore, C: Clock> TaskStore<S, C> {
    /// Loads the persisted collection and starts the session.
    ///
    /// A missing key, unreadable storage or a malformed payload all start
    /// from an empty collection; individually corrupt records are skipped.
    pub fn open(backend: S, clock: C, config: StoreConfig) -> Self {
        let storage = Storage::new(backend);
        let tasks = load_tasks(&storage, &config.storage_key);
        info!(
            "event=store_open module=store status=ok key={} tasks={} persist_delay_ms={}",
            config.storage_key,
            tasks.len(),
            config.persist_delay_ms
        );

        Self {
            persist: Debouncer::new(config.persist_delay()),
            storage,
            clock,
            config,
            tasks,
            subscribers: Vec::new(),
            next_subscription: 0,
            revision: 0,
        }
    }

    /// Returns the settings the store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the clock that derived views read `now` from.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutation counter; changes whenever the collection changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the number of tasks in the collection.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Creates a task with a fresh id and `created_at == updated_at == now`.
    pub fn add(&mut self, data: NewTask) -> Task {
        let task = Task::create(generate_task_id(), data, self.clock.now());
        debug!("event=task_add module=store status=ok id={}", task.id);
        self.tasks.push(task.clone());
        self.commit();
        task
    }

    /// Merges `patch` over the task with `id`.
    ///
    /// Returns `None` (and changes nothing) when no task has that id.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Option<Task> {
        let now = self.clock.now();
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.apply(patch);
        task.touch(now);
        let updated = task.clone();

        debug!("event=task_update module=store status=ok id={id}");
        self.commit();
        Some(updated)
    }

    /// Removes the task with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            debug!("event=task_delete module=store status=skipped id={id} reason=not_found");
            return false;
        }

        debug!("event=task_delete module=store status=ok id={id}");
        self.commit();
        true
    }

    /// Flips completion. Unknown ids are ignored.
    pub fn toggle_complete(&mut self, id: &str) {
        let now = self.clock.now();
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_toggle module=store status=skipped id={id} reason=not_found");
            return;
        };
        task.is_complete = !task.is_complete;
        task.touch(now);

        debug!(
            "event=task_toggle module=store status=ok id={} is_complete={}",
            id, task.is_complete
        );
        self.commit();
    }

    /// Returns the task with `id`, if present.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Current snapshot in insertion order.
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    /// Removes every task and schedules a write of the empty collection.
    pub fn clear(&mut self) {
        let removed = self.tasks.len();
        self.tasks.clear();
        info!("event=store_clear module=store status=ok removed={removed}");
        self.commit();
    }

    /// Replaces the collection wholesale. Ids are kept as given.
    pub fn import(&mut self, tasks: Vec<Task>) {
        let duplicates = count_duplicate_ids(&tasks);
        if duplicates > 0 {
            warn!(
                "event=store_import module=store status=warning duplicate_ids={duplicates}"
            );
        }

        self.tasks = tasks;
        info!(
            "event=store_import module=store status=ok tasks={}",
            self.tasks.len()
        );
        self.commit();
    }

    /// Reloads from storage, dropping unpersisted edits and any pending write.
    pub fn reset(&mut self) {
        if self.persist.cancel() {
            debug!("event=persist_cancel module=store status=ok reason=reset");
        }
        self.tasks = load_tasks(&self.storage, &self.config.storage_key);
        info!(
            "event=store_reset module=store status=ok tasks={}",
            self.tasks.len()
        );
        self.revision += 1;
        self.notify();
    }

    /// Registers `callback`, calls it once with the current snapshot, then
    /// again after every mutation until unsubscribed.
    pub fn subscribe(&mut self, mut callback: impl FnMut(&[Task]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        callback(&self.tasks);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns whether a subscription with `id` was removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Returns tasks matching every set field of `filter`, in insertion order.
    pub fn filtered(&self, filter: &TaskFilter) -> Vec<&Task> {
        let now = self.clock.now();
        self.tasks
            .iter()
            .filter(|task| filter.matches(task, now))
            .collect()
    }

    /// Returns all tasks ordered by `by`; ties keep insertion order.
    pub fn sorted(&self, by: TaskSortBy) -> Vec<&Task> {
        let mut view: Vec<&Task> = self.tasks.iter().collect();
        stats::sort_tasks(&mut view, by);
        view
    }

    /// Incomplete tasks grouped by quadrant at the current instant.
    pub fn matrix(&self) -> QuadrantGroups {
        group_by_quadrant(
            self.tasks.iter().filter(|task| !task.is_complete),
            self.clock.now(),
        )
    }

    /// Returns aggregate counts computed at the current instant.
    pub fn stats(&self) -> TaskStats {
        stats::stats_of(&self.tasks, self.clock.now())
    }

    /// Returns incomplete tasks due within the next 7 days, earliest first.
    pub fn upcoming(&self) -> Vec<&Task> {
        stats::upcoming(&self.tasks, self.clock.now())
    }

    /// Returns incomplete tasks already past due, earliest first.
    pub fn overdue(&self) -> Vec<&Task> {
        stats::overdue(&self.tasks, self.clock.now())
    }

    /// Returns the rounded completion percentage within `category`.
    pub fn category_completion_percentage(&self, category: Category) -> u32 {
        stats::completion_percentage_for_category(&self.tasks, category)
    }

    /// Returns whether a debounced write is waiting.
    pub fn has_pending_write(&self) -> bool {
        self.persist.is_pending()
    }

    /// When the pending write becomes due, if any.
    pub fn next_persist_deadline(&self) -> Option<DateTime<Utc>> {
        self.persist.deadline()
    }

    /// Event-loop hook: writes the snapshot once the quiet interval passed.
    ///
    /// Returns whether a write was attempted.
    pub fn run_pending(&mut self) -> bool {
        if !self.persist.fire_if_due(self.clock.now()) {
            return false;
        }
        self.write_snapshot();
        true
    }

    /// Writes immediately if a write is pending.
    pub fn flush(&mut self) -> bool {
        if !self.persist.take_pending() {
            return false;
        }
        self.write_snapshot();
        true
    }

    fn commit(&mut self) {
        self.revision += 1;
        if self.persist.schedule(self.clock.now()) {
            debug!("event=persist_schedule module=store status=ok superseded=true");
        }
        self.notify();
    }

    fn notify(&mut self) {
        for (_, callback) in &mut self.subscribers {
            callback(&self.tasks);
        }
    }

    fn write_snapshot(&self) {
        let records = encode_tasks(&self.tasks);
        if self.storage.set(&self.config.storage_key, &records) {
            info!(
                "event=persist_write module=store status=ok key={} tasks={} revision={}",
                self.config.storage_key,
                records.len(),
                self.revision
            );
        }
    }
}

impl<S: KeyValueStore, C: Clock> Drop for TaskStore<S, C> {
    fn drop(&mut self) {
        self.flush();
    }
}

fn load_tasks<S: KeyValueStore>(storage: &Storage<S>, key: &str) -> Vec<Task> {
    let values: Vec<serde_json::Value> = storage.get(key, Vec::new());
    let decoded = decode_records(values);
    if !decoded.skipped.is_empty() {
        warn!(
            "event=store_load module=store status=partial key={} loaded={} skipped={}",
            key,
            decoded.tasks.len(),
            decoded.skipped.len()
        );
    }
    decoded.tasks
}

fn count_duplicate_ids(tasks: &[Task]) -> usize {
    let mut seen = HashSet::with_capacity(tasks.len());
    tasks
        .iter()
        .filter(|task| !seen.insert(task.id.as_str()))
        .count()
}
