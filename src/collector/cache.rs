//! In-memory per-symbol trade cache with retention pruning

use std::collections::HashMap;

use crate::common::types::TradeRecord;

/// Number of seconds in a week
pub const SECONDS_IN_A_WEEK: i64 = 604_800;

/// Maximum age of a retained record relative to the newest record's time
pub const RETENTION_WINDOW: i64 = 3 * SECONDS_IN_A_WEEK;

/// Deduplicated record set for one symbol.
///
/// Only the poller mutates a cache; there are no concurrent writers.
#[derive(Debug, Default)]
pub struct SymbolCache {
    records: HashMap<i64, TradeRecord>,
    dirty: bool,
}

impl SymbolCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record if its id is not already known.
    ///
    /// Returns whether an insertion occurred; the dirty flag is raised only
    /// on a real insertion, so re-adding an existing id is a no-op.
    pub fn add(&mut self, record: TradeRecord) -> bool {
        if self.records.contains_key(&record.id) {
            return false;
        }
        self.records.insert(record.id, record);
        self.dirty = true;
        true
    }

    /// Load already-persisted records without touching the dirty flag
    pub fn hydrate(&mut self, records: Vec<TradeRecord>) {
        for record in records {
            self.records.entry(record.id).or_insert(record);
        }
    }

    /// True iff at least one record was added since the flag was last cleared
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.records.contains_key(&id)
    }

    /// Time of the newest record, if any
    pub fn max_time(&self) -> Option<i64> {
        self.records.values().map(|r| r.time).max()
    }

    /// Drop every record older than the retention window.
    ///
    /// The cutoff is derived from the true maximum `time` across the cache,
    /// never from id ordering; the boundary is inclusive, so a record at
    /// exactly `max_time - RETENTION_WINDOW` survives. Returns the number of
    /// removed records.
    pub fn prune(&mut self) -> usize {
        let Some(max_time) = self.max_time() else {
            return 0;
        };
        let cutoff = max_time - RETENTION_WINDOW;

        let before = self.records.len();
        self.records.retain(|_, record| record.time >= cutoff);
        before - self.records.len()
    }

    /// Records sorted by id, for deterministic persistence
    pub fn sorted_records(&self) -> Vec<&TradeRecord> {
        let mut records: Vec<&TradeRecord> = self.records.values().collect();
        records.sort_by_key(|r| r.id);
        records
    }
}
