//! Deferred task queue
//!
//! The host owns the clock. It calls [`Scheduler::take_due`] with the
//! current instant, typically after painting a frame, and receives every
//! task whose deadline has passed, earliest first. Nothing here spawns
//! threads or sleeps.

use std::time::Duration;
use tracing::debug;
use web_time::Instant;

/// Identifies one scheduled task for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Entry<T> {
    handle: TaskHandle,
    due: Instant,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to become due `delay` after `now`.
    pub fn schedule(&mut self, task: T, delay: Duration, now: Instant) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            due: now + delay,
            task,
        });
        debug!("[SCHEDULER] Task {:?} due in {:?}", handle, delay);
        handle
    }

    /// Drop a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle != handle);
        let cancelled = self.entries.len() != before;
        if cancelled {
            debug!("[SCHEDULER] Cancelled task {:?}", handle);
        }
        cancelled
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|entry| entry.handle == handle)
    }

    /// Earliest deadline among pending tasks
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.due).min()
    }

    /// Remove and return every task due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<(TaskHandle, T)> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry.due <= now);
        self.entries = pending;
        due.sort_by_key(|entry| (entry.due, entry.handle));
        due.into_iter().map(|entry| (entry.handle, entry.task)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
