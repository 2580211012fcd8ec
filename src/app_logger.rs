//! In-process log store.
//!
//! Operational events (renames applied, arbitration outcomes, watcher
//! lifecycle) go into a fixed-capacity ring buffer so embedders can show
//! recent activity without the daemon writing log files. Warnings
//! additionally go to stderr at the call sites.

use serde::{Deserialize, Serialize};

/// A single structured log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp_ms: i64,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub(crate) const LOG_RING_CAPACITY: usize = 500;

/// Fixed-capacity circular buffer of log entries. Oldest entries are
/// overwritten once full; ids stay monotonic across wraps.
pub struct LogRingBuffer {
    entries: Vec<Option<LogEntry>>,
    capacity: usize,
    /// Write position (wraps around)
    write_pos: usize,
    /// Number of entries currently stored (≤ capacity)
    count: usize,
    /// Monotonically increasing ID for the next entry
    next_id: u64,
}

impl LogRingBuffer {
    pub fn new(capacity: usize) -> Self {
        let mut entries = Vec::with_capacity(capacity);
        entries.resize_with(capacity, || None);
        Self {
            entries,
            capacity,
            write_pos: 0,
            count: 0,
            next_id: 1,
        }
    }

    /// Append an entry. Returns the assigned id.
    pub fn push(&mut self, level: &str, source: &str, message: String) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.entries[self.write_pos] = Some(LogEntry {
            id,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            level: level.to_string(),
            source: source.to_string(),
            message,
        });
        self.write_pos = (self.write_pos + 1) % self.capacity;
        if self.count < self.capacity {
            self.count += 1;
        }

        id
    }

    /// Entries in chronological order (oldest first), up to `limit`
    /// most-recent. `limit` 0 returns everything stored.
    pub fn get_entries(&self, limit: usize) -> Vec<LogEntry> {
        if self.count == 0 {
            return Vec::new();
        }

        let effective_limit = if limit == 0 {
            self.count
        } else {
            limit.min(self.count)
        };

        // write_pos points at the oldest entry once the buffer has wrapped
        let start = if self.count < self.capacity {
            0
        } else {
            self.write_pos
        };

        let skip = self.count - effective_limit;
        let mut result = Vec::with_capacity(effective_limit);
        for i in skip..self.count {
            let idx = (start + i) % self.capacity;
            if let Some(entry) = &self.entries[idx] {
                result.push(entry.clone());
            }
        }
        result
    }
}
