use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// One unit of pending work plus how many times it has been re-enqueued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub url: String,
    pub passes: u32,
}

/// Shared pending/processed bookkeeping for one pipeline stage.
///
/// A URL is in at most one of {pending, processed, failed} at any instant;
/// while a worker holds a popped task it is in none of them. Pop, complete
/// and requeue are each a single atomic transition, so two workers can
/// never hold the same task.
pub struct TaskQueue {
    state: Mutex<QueueState>,
    max_passes: u32,
}

#[derive(Default)]
struct QueueState {
    pending: Vec<Task>,
    pending_urls: HashSet<String>,
    processed: Vec<String>,
    processed_urls: HashSet<String>,
    failed: Vec<String>,
    failed_urls: HashSet<String>,
    total: usize,
}

impl TaskQueue {
    pub fn new(max_passes: u32) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            max_passes,
        }
    }

    pub fn seeded<I>(urls: I, max_passes: u32) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let queue = Self::new(max_passes);
        for url in urls {
            queue.push_unique(url);
        }
        queue
    }

    /// Insert a URL unless it is already pending, processed, or failed.
    /// Returns whether it was added.
    pub fn push_unique(&self, url: impl Into<String>) -> bool {
        let url = url.into();
        let mut state = self.lock();
        if state.pending_urls.contains(&url)
            || state.processed_urls.contains(&url)
            || state.failed_urls.contains(&url)
        {
            return false;
        }
        state.pending_urls.insert(url.clone());
        state.pending.push(Task { url, passes: 0 });
        state.total += 1;
        true
    }

    /// Atomically remove and return one pending task.
    pub fn pop(&self) -> Option<Task> {
        let mut state = self.lock();
        let task = state.pending.pop()?;
        state.pending_urls.remove(&task.url);
        Some(task)
    }

    /// Record a popped task as terminally handled.
    pub fn complete(&self, url: impl Into<String>) {
        let url = url.into();
        let mut state = self.lock();
        if state.processed_urls.insert(url.clone()) {
            state.processed.push(url);
        }
    }

    /// Return a popped task to pending for another pass, or record it as
    /// failed once the pass ceiling is reached. Returns whether the task
    /// went back to pending.
    pub fn requeue(&self, mut task: Task) -> bool {
        task.passes += 1;
        let mut state = self.lock();
        if task.passes >= self.max_passes.max(1) {
            if state.failed_urls.insert(task.url.clone()) {
                state.failed.push(task.url);
            }
            false
        } else {
            state.pending_urls.insert(task.url.clone());
            state.pending.push(task);
            true
        }
    }

    /// Drop pending tasks not matching the predicate, shrinking the total
    /// accordingly. Runs once between stages; concurrent workers must not
    /// be draining the queue while it executes.
    pub fn retain<F>(&self, mut keep: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let mut state = self.lock();
        let before = state.pending.len();
        let mut kept = Vec::with_capacity(before);
        for task in std::mem::take(&mut state.pending) {
            if keep(&task.url) {
                kept.push(task);
            } else {
                state.pending_urls.remove(&task.url);
            }
        }
        let removed = before - kept.len();
        state.pending = kept;
        state.total -= removed;
        removed
    }

    /// `(processed, total)` counts for progress lines.
    pub fn progress(&self) -> (usize, usize) {
        let state = self.lock();
        (state.processed.len(), state.total)
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn processed_len(&self) -> usize {
        self.lock().processed.len()
    }

    pub fn failed_len(&self) -> usize {
        self.lock().failed.len()
    }

    pub fn total(&self) -> usize {
        self.lock().total
    }

    pub fn processed_snapshot(&self) -> Vec<String> {
        self.lock().processed.clone()
    }

    pub fn failed_snapshot(&self) -> Vec<String> {
        self.lock().failed.clone()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // A panicked holder leaves the sets structurally intact.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
