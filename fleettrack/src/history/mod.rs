//! Bounded per-vehicle position history.
//!
//! Each tracked vehicle carries a trail of its recent positions, oldest
//! first. The trail is append-only except for FIFO eviction: once the cap is
//! reached, every append drops the oldest entry so the length never exceeds
//! the cap.
//!
//! # Design
//!
//! - Backed by a `VecDeque`; append and eviction are O(1)
//! - Readers get an owned snapshot, never a view into the live buffer
//! - Synchronization is the store's responsibility; this type is not
//!   internally locked

use std::collections::VecDeque;

use crate::geo::Position;

/// Default maximum entries retained per vehicle.
pub const DEFAULT_HISTORY_CAP: usize = 100;

/// Bounded, ordered record of a vehicle's past positions.
#[derive(Debug, Clone)]
pub struct PositionHistory {
    /// Recorded positions, oldest first.
    entries: VecDeque<Position>,
    /// Maximum entries to retain.
    cap: usize,
}

impl Default for PositionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAP)
    }
}

impl PositionHistory {
    /// Create an empty history retaining at most `cap` entries.
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Append a position to the tail, evicting the oldest entry if the
    /// history is at capacity. Returns true if an entry was evicted.
    pub fn append(&mut self, position: Position) -> bool {
        self.entries.push_back(position);

        let mut evicted = false;
        while self.entries.len() > self.cap {
            self.entries.pop_front();
            evicted = true;
        }
        evicted
    }

    /// Owned copy of the history, oldest first. Safe to iterate without
    /// holding any store lock.
    pub fn snapshot(&self) -> Vec<Position> {
        self.entries.iter().cloned().collect()
    }

    /// Number of entries currently retained.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recently appended position.
    pub fn latest(&self) -> Option<&Position> {
        self.entries.back()
    }
}
