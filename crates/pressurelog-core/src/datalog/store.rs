//! Bounded log store
//!
//! Keeps the most recent samples in insertion order, dropping the oldest
//! once the fixed capacity is reached.

use std::collections::vec_deque;
use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::LogEntry;

/// Default capacity: one sample every 10 minutes for 14 days
pub const DEFAULT_CAPACITY: usize = 2016;

/// Largest capacity the logger accepts
pub const MAX_CAPACITY: usize = 1_000_000;

/// Fixed-capacity FIFO of log entries
#[derive(Debug, Clone)]
pub struct LogStore {
    /// Entries, oldest first
    entries: VecDeque<LogEntry>,
    /// Maximum number of entries retained
    capacity: usize,
}

impl LogStore {
    /// Create an empty store holding at most `capacity` entries
    ///
    /// Only up to [`DEFAULT_CAPACITY`] slots are allocated up front; the
    /// buffer grows on demand beyond that.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest one if the store is full
    ///
    /// Returns `true` if an entry was evicted. A zero-capacity store keeps
    /// nothing and never evicts.
    pub fn append(&mut self, entry: LogEntry) -> bool {
        if self.capacity == 0 {
            return false;
        }

        let evicted = self.entries.len() >= self.capacity;
        if evicted {
            self.entries.pop_front();
        }

        self.entries.push_back(entry);
        evicted
    }

    /// Remove all entries, keeping the allocated buffer
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over entries, oldest first
    pub fn iter(&self) -> vec_deque::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest entry
    pub fn oldest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Copy the current contents
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().copied().collect()
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<'a> IntoIterator for &'a LogStore {
    type Item = &'a LogEntry;
    type IntoIter = vec_deque::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A log store shared between the sampler and the web handlers
///
/// Every operation takes the same lock, so appends, clears and snapshots
/// never interleave.
#[derive(Debug, Clone, Default)]
pub struct SharedLogStore {
    inner: Arc<Mutex<LogStore>>,
}

impl SharedLogStore {
    /// Wrap an existing store
    pub fn new(store: LogStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Append an entry under the lock, returning whether the oldest was evicted
    pub fn append(&self, entry: LogEntry) -> bool {
        self.inner.lock().append(entry)
    }

    /// Clear the store under the lock
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<LogEntry> {
        self.inner.lock().latest().copied()
    }

    /// Copy the entries as they are right now
    ///
    /// Later appends or clears do not affect the returned vector.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.inner.lock().snapshot()
    }
}
