//! Binary-search lookup of recorded snapshots by time.
//!
//! The index is a parallel array of timestamps extracted from the full
//! history. It is built once per transition into playback and
//! invalidated by any history mutation; lookups before it exists
//! report "no state" rather than guessing.

use crate::history::StateHistory;

/// Lazily built timestamp index over the full history.
#[derive(Default)]
pub struct TimeIndex {
    times: Option<Vec<f32>>,
}

impl TimeIndex {
    pub fn new() -> Self {
        Self { times: None }
    }

    /// Whether the index is currently usable.
    pub fn is_built(&self) -> bool {
        self.times.is_some()
    }

    /// Drop the index. Called after any history mutation.
    pub fn invalidate(&mut self) {
        self.times = None;
    }

    /// Build the index from a time-sorted history.
    pub fn build(&mut self, history: &mut StateHistory) {
        history.sort_by_time();
        self.times = Some(history.times());
    }

    /// Index of the snapshot with the largest timestamp `<= time`
    /// (floor semantics), or the first snapshot when `time` precedes
    /// everything. `None` when the index is unbuilt or empty.
    pub fn find_closest(&self, time: f32) -> Option<usize> {
        let times = self.times.as_ref()?;
        if times.is_empty() {
            return None;
        }
        let upper = times.partition_point(|&t| t <= time);
        Some(upper.saturating_sub(1))
    }
}
