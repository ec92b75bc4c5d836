// Recent reading history, most recent first
use super::reading::format_distance;
use serde::Serialize;
use std::collections::VecDeque;

/// Number of rows kept in the history table.
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub label: String,
    pub front: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
    /// Rendered front, left, right cells
    pub cells: [String; 3],
}

impl HistoryEntry {
    pub fn new(label: String, front: Option<f64>, left: Option<f64>, right: Option<f64>) -> Self {
        let cells = [
            format_distance(front),
            format_distance(left),
            format_distance(right),
        ];
        Self {
            label,
            front,
            left,
            right,
            cells,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoundedHistoryLog {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl BoundedHistoryLog {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Insert at the front and drop the oldest entries past capacity.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for BoundedHistoryLog {
    fn default() -> Self {
        Self::new()
    }
}
