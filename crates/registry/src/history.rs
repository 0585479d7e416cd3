//! Bounded per-entity change history.

use std::collections::VecDeque;

use serde::Serialize;

use nethub_core::entity::Attributes;
use nethub_core::types::{EntityId, Timestamp};

/// One recorded mutation: the full attribute map as it looked right after
/// the update was applied.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub entity_id: EntityId,
    /// The `updated_at` of the mutation that produced this snapshot.
    pub timestamp: Timestamp,
    pub snapshot: Attributes,
}

/// FIFO log of [`HistoryEntry`] values with a fixed capacity.
///
/// Appending beyond capacity silently evicts the oldest entry, so the log
/// always holds the most recent `cap` mutations in chronological order.
#[derive(Debug)]
pub struct BoundedHistory {
    cap: usize,
    entries: VecDeque<HistoryEntry>,
}

impl BoundedHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            entries: VecDeque::new(),
        }
    }

    /// Append an entry, evicting from the front if the log is full.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.cap {
            self.entries.pop_front();
        }
    }

    /// Clone the entries oldest-first.
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
