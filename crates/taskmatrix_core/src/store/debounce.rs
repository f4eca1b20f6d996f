//! Deadline-based debouncer.
//!
//! A pending deadline is a cancellable deferred task: scheduling again
//! replaces it, so a burst of triggers fires once, a quiet interval after the
//! last trigger.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<DateTime<Utc>>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Arms the deadline at `now + quiet`, saturating at the latest
    /// representable instant. Returns `true` when an earlier pending deadline
    /// was superseded.
    pub fn schedule(&mut self, now: DateTime<Utc>) -> bool {
        let deadline = now
            .checked_add_signed(self.quiet)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.deadline.replace(deadline).is_some()
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consumes the deadline if it has been reached.
    pub fn fire_if_due(&mut self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Consumes any pending deadline regardless of time.
    pub fn take_pending(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn cancel(&mut self) -> bool {
        self.take_pending()
    }
}
