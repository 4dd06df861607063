//! Linear undo/redo over full-state snapshots.
//!
//! Each entry holds the document state *after* an action. Undo moves the
//! cursor back and hands out the snapshot there; pushing while not at the
//! tail discards the redo branch.

use crate::elements::{Element, ElementId};
use std::collections::HashMap;
use web_time::{SystemTime, UNIX_EPOCH};

/// Default number of snapshots kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Deep copy of the document state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub elements: HashMap<ElementId, Element>,
    pub element_order: Vec<ElementId>,
    pub selected_ids: Vec<ElementId>,
}

/// A labelled snapshot in the log.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub snapshot: Snapshot,
    pub label: String,
    /// Milliseconds since the UNIX epoch.
    pub timestamp_ms: u64,
}

/// Summary of the history state for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryInfo {
    pub can_undo: bool,
    pub can_redo: bool,
    pub len: usize,
    pub index: Option<usize>,
    pub last_action: Option<String>,
}

/// Label and position of one entry, as returned by `HistoryManager::entries`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub index: usize,
    pub label: String,
    pub timestamp_ms: u64,
    pub is_current: bool,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Bounded snapshot log with a cursor.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
    capacity: usize,
    batching: bool,
    batch_start: Option<usize>,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            capacity: capacity.max(1),
            batching: false,
            batch_start: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a snapshot. Ignored while a batch is open.
    pub fn push(&mut self, snapshot: Snapshot, label: &str) {
        if self.batching {
            return;
        }

        // Drop the redo branch
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);

        self.entries.push(HistoryEntry {
            snapshot,
            label: label.to_string(),
            timestamp_ms: now_ms(),
        });
        let mut cursor = self.entries.len() - 1;

        if self.entries.len() > self.capacity {
            self.entries.remove(0);
            cursor -= 1;
        }
        self.cursor = Some(cursor);
        log::debug!("History push '{}' ({} entries)", label, self.entries.len());
    }

    /// Open a batch. Pushes are ignored until `end_batch`. Nested calls are no-ops.
    pub fn start_batch(&mut self) {
        if self.batching {
            return;
        }
        self.batching = true;
        self.batch_start = self.cursor;
    }

    /// Close the batch and record exactly one snapshot for it.
    pub fn end_batch(&mut self, snapshot: Snapshot, label: &str) {
        if !self.batching {
            return;
        }
        self.batching = false;
        self.batch_start = None;
        self.push(snapshot, label);
    }

    /// Close the batch without recording anything.
    pub fn cancel_batch(&mut self) {
        self.batching = false;
        self.batch_start = None;
    }

    pub fn is_batching(&self) -> bool {
        self.batching
    }

    /// Step back. Returns the snapshot at the new cursor, or `None` at the start.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        let cursor = self.cursor? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor).map(|e| &e.snapshot)
    }

    /// Step forward. Returns the snapshot at the new cursor, or `None` at the end.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        let cursor = self.cursor.map_or(0, |c| c + 1);
        self.cursor = Some(cursor);
        self.entries.get(cursor).map(|e| &e.snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        match self.cursor {
            Some(c) => c + 1 < self.entries.len(),
            None => !self.entries.is_empty(),
        }
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.cursor
            .and_then(|c| self.entries.get(c))
            .map(|e| &e.snapshot)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
        self.batching = false;
        self.batch_start = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn info(&self) -> HistoryInfo {
        HistoryInfo {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            len: self.entries.len(),
            index: self.cursor,
            last_action: self
                .cursor
                .and_then(|c| self.entries.get(c))
                .map(|e| e.label.clone()),
        }
    }

    pub fn entries(&self) -> Vec<EntryInfo> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, e)| EntryInfo {
                index,
                label: e.label.clone(),
                timestamp_ms: e.timestamp_ms,
                is_current: Some(index) == self.cursor,
            })
            .collect()
    }
}
