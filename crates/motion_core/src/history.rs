//! Recorded state trajectory: the full history and its culled twin.
//!
//! Snapshots are appended in time order while recording. The culled
//! sequence is kept as indices into the full sequence, which makes the
//! "culled is a subsequence of full" invariant structural rather than
//! something to re-verify: a culled entry cannot exist without its
//! full-history backing record.

use bevy::math::Vec2;

use crate::body::MotionBody;
use crate::pool::{Pool, Poolable};

/// A recorded copy of the body's kinematic state at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateSnapshot {
    pub time: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub heading: f32,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            time: 0.0,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            heading: 0.0,
        }
    }
}

impl Poolable for StateSnapshot {
    fn reinit(&mut self) {
        *self = Self::default();
    }
}

impl StateSnapshot {
    /// Copy the body's current fields into this snapshot.
    pub fn capture(&mut self, time: f32, body: &MotionBody) {
        self.time = time;
        self.position = body.position();
        self.velocity = body.velocity();
        self.acceleration = body.acceleration();
        self.heading = body.heading();
    }

    /// Write this snapshot back onto the live body.
    pub fn apply(&self, body: &mut MotionBody) {
        body.set_position(self.position);
        body.set_velocity(self.velocity);
        body.set_acceleration(self.acceleration);
        body.set_heading(self.heading);
    }
}

/// Append-only, time-ordered store of snapshots plus the culled
/// subsequence used for trail display.
pub struct StateHistory {
    full: Vec<Box<StateSnapshot>>,
    culled: Vec<usize>,
    pool: Pool<StateSnapshot>,
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHistory {
    pub fn new() -> Self {
        Self {
            full: Vec::new(),
            culled: Vec::new(),
            pool: Pool::new(),
        }
    }

    /// Snapshot the body and append it. The snapshot also joins the
    /// culled sequence unless its position repeats the previous full
    /// entry's position, so runs of stationary frames collapse into
    /// one representative entry.
    pub fn record_state(&mut self, time: f32, body: &MotionBody) {
        let mut snapshot = self.pool.acquire();
        snapshot.capture(time, body);

        let keep_for_trail = match self.full.last() {
            None => true,
            Some(last) => last.position != snapshot.position,
        };
        if keep_for_trail {
            self.culled.push(self.full.len());
        }
        self.full.push(snapshot);

        debug_assert!(self.is_time_ordered(), "history must stay time-ordered");
    }

    pub fn len(&self) -> usize {
        self.full.len()
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }

    pub fn get(&self, index: usize) -> &StateSnapshot {
        &self.full[index]
    }

    pub fn last(&self) -> Option<&StateSnapshot> {
        self.full.last().map(|s| &**s)
    }

    pub fn culled_len(&self) -> usize {
        self.culled.len()
    }

    /// Time-ordered view of the culled subsequence.
    pub fn culled(&self) -> impl Iterator<Item = &StateSnapshot> + '_ {
        self.culled.iter().map(move |&i| &*self.full[i])
    }

    /// Timestamps of the full history, in order.
    pub fn times(&self) -> Vec<f32> {
        self.full.iter().map(|s| s.time).collect()
    }

    /// Release every snapshot back to the pool and empty both
    /// sequences.
    pub fn clear(&mut self) {
        for snapshot in self.full.drain(..) {
            self.pool.release(snapshot);
        }
        self.culled.clear();
    }

    /// Remove (and pool) every snapshot with `time >= cutoff` from
    /// both sequences. Used when recording resumes mid-playback to
    /// overwrite the stale future left by a scrub.
    pub fn truncate_after(&mut self, cutoff: f32) {
        while self
            .full
            .last()
            .is_some_and(|snapshot| snapshot.time >= cutoff)
        {
            let snapshot = self.full.pop().expect("checked non-empty");
            self.pool.release(snapshot);
        }
        while self
            .culled
            .last()
            .is_some_and(|&index| index >= self.full.len())
        {
            self.culled.pop();
        }
    }

    /// Guard against out-of-order insertion before building the time
    /// index. Appends are monotonic by construction, so this is
    /// normally a no-op; if a reorder does happen, the culled
    /// subsequence is rebuilt to match.
    pub fn sort_by_time(&mut self) {
        if self.is_time_ordered() {
            return;
        }
        self.full.sort_by(|a, b| a.time.total_cmp(&b.time));
        self.culled.clear();
        for i in 0..self.full.len() {
            if i == 0 || self.full[i].position != self.full[i - 1].position {
                self.culled.push(i);
            }
        }
    }

    fn is_time_ordered(&self) -> bool {
        self.full.windows(2).all(|pair| pair[0].time <= pair[1].time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: f32, y: f32) -> MotionBody {
        let mut body = MotionBody::default();
        body.set_position(Vec2::new(x, y));
        body
    }

    #[test]
    fn test_first_snapshot_joins_both_sequences() {
        let mut history = StateHistory::new();
        history.record_state(0.0, &body_at(0.0, 0.0));
        assert_eq!(history.len(), 1);
        assert_eq!(history.culled_len(), 1);
    }

    #[test]
    fn test_stationary_run_collapses_in_culled() {
        // Identical positions collapse to one trail entry
        let mut history = StateHistory::new();
        for i in 0..300 {
            history.record_state(i as f32 / 60.0, &body_at(0.0, 0.0));
        }
        assert_eq!(history.len(), 300);
        assert_eq!(
            history.culled_len(),
            1,
            "a stationary run should keep one representative entry"
        );
    }

    #[test]
    fn test_culled_is_subsequence_of_full() {
        let positions = [
            (0.0, 0.0),
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 0.0),
            (1.0, 0.0),
            (2.0, 1.0),
            (0.0, 0.0),
        ];
        let mut history = StateHistory::new();
        for (i, &(x, y)) in positions.iter().enumerate() {
            history.record_state(i as f32 * 0.1, &body_at(x, y));
        }
        assert_eq!(history.len(), 7);
        assert_eq!(history.culled_len(), 4);

        let culled: Vec<&StateSnapshot> = history.culled().collect();
        let mut previous_time = f32::NEG_INFINITY;
        for entry in &culled {
            assert!(entry.time >= previous_time, "culled must stay time-ordered");
            previous_time = entry.time;
        }
        for pair in culled.windows(2) {
            assert_ne!(
                pair[0].position, pair[1].position,
                "consecutive culled entries must differ in position"
            );
        }
    }

    #[test]
    fn test_truncate_after_drops_both_sequences() {
        let mut history = StateHistory::new();
        for i in 0..10 {
            history.record_state(i as f32, &body_at(i as f32, 0.0));
        }
        history.truncate_after(4.0);
        assert_eq!(history.len(), 4);
        assert!(history.last().unwrap().time < 4.0);
        assert!(history.culled().all(|s| s.time < 4.0));
    }

    #[test]
    fn test_truncate_past_everything_empties() {
        let mut history = StateHistory::new();
        for i in 0..5 {
            history.record_state(i as f32, &body_at(i as f32, 0.0));
        }
        history.truncate_after(0.0);
        assert!(history.is_empty());
        assert_eq!(history.culled_len(), 0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut history = StateHistory::new();
        for i in 0..5 {
            history.record_state(i as f32, &body_at(i as f32, 0.0));
        }
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.culled_len(), 0);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.culled_len(), 0);
    }

    #[test]
    fn test_cleared_snapshots_are_recycled() {
        let mut history = StateHistory::new();
        for i in 0..5 {
            history.record_state(i as f32, &body_at(i as f32, 0.0));
        }
        history.clear();
        assert_eq!(history.pool.free_count(), 5);
        history.record_state(9.0, &body_at(9.0, 9.0));
        assert_eq!(history.pool.free_count(), 4);
        assert_eq!(history.get(0).time, 9.0);
    }

    #[test]
    fn test_apply_round_trip() {
        let mut recorded = MotionBody::default();
        recorded.set_position(Vec2::new(1.0, 2.0));
        recorded.set_velocity(Vec2::new(3.0, 4.0));
        recorded.set_acceleration(Vec2::new(5.0, 6.0));
        recorded.set_heading(0.7);

        let mut history = StateHistory::new();
        history.record_state(1.5, &recorded);

        let mut restored = MotionBody::default();
        history.get(0).apply(&mut restored);
        assert_eq!(restored, recorded);
    }
}
