//! Smoothing of raw drag input into position, velocity, and
//! acceleration.
//!
//! Raw per-frame pointer input is jittery; averaging over a short
//! sliding window keeps the derived velocity and acceleration arrows
//! visually stable without losing responsiveness. Each averaged
//! position is paired with the averaged timestamp of its window, so
//! the finite differences between consecutive averages come out in
//! world units per second regardless of how full the window is.

use bevy::math::Vec2;
use std::collections::VecDeque;

/// Converts a noisy stream of timed input points into a smoothed
/// position plus velocity and acceleration estimates.
pub struct SamplingMotionModel {
    window_size: usize,
    scale_divisor: f32,
    window: VecDeque<(f32, Vec2)>,
    average_mid: Vec2,
    average_time: Option<f32>,
    velocity: Vec2,
    acceleration: Vec2,
}

impl SamplingMotionModel {
    /// `window_size` bounds the sliding window; `scale_divisor` is an
    /// empirical calibration divisor applied to the velocity and
    /// acceleration read-outs.
    pub fn new(window_size: usize, scale_divisor: f32, x: f32, y: f32) -> Self {
        Self {
            window_size: window_size.max(1),
            scale_divisor: if scale_divisor > 0.0 { scale_divisor } else { 1.0 },
            window: VecDeque::with_capacity(window_size.max(1)),
            average_mid: Vec2::new(x, y),
            average_time: None,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
        }
    }

    /// Clear the window and seed the smoothed position. Velocity and
    /// acceleration restart from zero; the seed carries no timestamp,
    /// so the first point after a reset produces no derivative spike.
    pub fn reset(&mut self, position: Vec2) {
        self.window.clear();
        self.average_mid = position;
        self.average_time = None;
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
    }

    /// Push a timed point into the window (evicting the oldest when
    /// full) and recompute the averaged position and its derivatives.
    pub fn add_point_and_update(&mut self, time: f32, point: Vec2) {
        self.window.push_back((time, point));
        while self.window.len() > self.window_size {
            self.window.pop_front();
        }

        let n = self.window.len() as f32;
        let mut sum_time = 0.0f32;
        let mut sum_point = Vec2::ZERO;
        for &(t, p) in &self.window {
            sum_time += t;
            sum_point += p;
        }
        let average_time = sum_time / n;
        let average = sum_point / n;

        if let Some(previous_time) = self.average_time {
            let elapsed = average_time - previous_time;
            // Identical consecutive timestamps leave the estimates as
            // they were rather than dividing by zero.
            if elapsed > f32::EPSILON {
                let velocity = (average - self.average_mid) / elapsed;
                self.acceleration = (velocity - self.velocity) / elapsed;
                self.velocity = velocity;
            }
        }

        self.average_mid = average;
        self.average_time = Some(average_time);
    }

    /// Smoothed position: the mean of the window.
    pub fn average_mid(&self) -> Vec2 {
        self.average_mid
    }

    /// Velocity estimate in world units per second, calibrated.
    pub fn velocity(&self) -> Vec2 {
        self.velocity / self.scale_divisor
    }

    /// Acceleration estimate in world units per second squared,
    /// calibrated.
    pub fn acceleration(&self) -> Vec2 {
        self.acceleration / self.scale_divisor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_uniform_motion_velocity() {
        // 1 unit per 0.1 s along +X
        let mut model = SamplingMotionModel::new(10, 1.0, 0.0, 0.0);
        model.add_point_and_update(0.0, Vec2::new(0.0, 0.0));
        model.add_point_and_update(0.1, Vec2::new(1.0, 0.0));
        model.add_point_and_update(0.2, Vec2::new(2.0, 0.0));

        let v = model.velocity();
        assert!(
            (v.x - 10.0).abs() < 1e-3 && v.y.abs() < 1e-6,
            "expected velocity near (10, 0), got {:?}",
            v
        );
        let a = model.acceleration();
        assert!(
            a.length() < 1e-3,
            "uniform motion should have near-zero acceleration, got {:?}",
            a
        );
    }

    #[test]
    fn test_static_input_has_zero_derivatives() {
        let mut model = SamplingMotionModel::new(10, 1.0, 3.0, 4.0);
        for i in 0..20 {
            model.add_point_and_update(i as f32 * 0.016, Vec2::new(3.0, 4.0));
        }
        assert_eq!(model.average_mid(), Vec2::new(3.0, 4.0));
        assert!(model.velocity().length() < 1e-6);
        assert!(model.acceleration().length() < 1e-6);
    }

    #[test]
    fn test_window_is_bounded() {
        // Only the window_size most recent points influence the mean
        let mut model = SamplingMotionModel::new(10, 1.0, 0.0, 0.0);
        for i in 0..5 {
            model.add_point_and_update(i as f32 * 0.1, Vec2::new(100.0, 100.0));
        }
        for i in 5..15 {
            model.add_point_and_update(i as f32 * 0.1, Vec2::new(2.0, -2.0));
        }
        assert_eq!(
            model.average_mid(),
            Vec2::new(2.0, -2.0),
            "evicted samples must not influence the average"
        );
    }

    #[test]
    fn test_reset_clears_window_and_derivatives() {
        let mut model = SamplingMotionModel::new(10, 1.0, 0.0, 0.0);
        model.add_point_and_update(0.0, Vec2::new(0.0, 0.0));
        model.add_point_and_update(0.1, Vec2::new(5.0, 0.0));

        model.reset(Vec2::new(1.0, 1.0));
        assert_eq!(model.average_mid(), Vec2::new(1.0, 1.0));
        assert_eq!(model.velocity(), Vec2::ZERO);

        // The first point after a reset must not spike the velocity
        model.add_point_and_update(0.2, Vec2::new(9.0, 9.0));
        assert_eq!(model.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_duplicate_timestamp_is_a_no_op_for_derivatives() {
        let mut model = SamplingMotionModel::new(10, 1.0, 0.0, 0.0);
        model.add_point_and_update(0.0, Vec2::new(0.0, 0.0));
        model.add_point_and_update(0.1, Vec2::new(1.0, 0.0));
        let before = model.velocity();
        // Window mean time barely moves; ensure no division blow-up by
        // repeating the same timestamp
        model.add_point_and_update(0.1, Vec2::new(1.0, 0.0));
        assert!(model.velocity().is_finite(), "velocity must stay finite");
        assert!(before.is_finite());
    }

    #[test]
    fn test_scale_divisor_calibrates_outputs() {
        let mut model = SamplingMotionModel::new(10, 2.0, 0.0, 0.0);
        model.add_point_and_update(0.0, Vec2::new(0.0, 0.0));
        model.add_point_and_update(0.1, Vec2::new(1.0, 0.0));
        model.add_point_and_update(0.2, Vec2::new(2.0, 0.0));
        assert!(
            (model.velocity().x - 5.0).abs() < 1e-3,
            "divisor of 2 should halve the read-out, got {}",
            model.velocity().x
        );
    }

    #[test]
    fn test_jittered_linear_drag_stays_near_trend() {
        // Noisy pointer input along x = 5t; the smoothed velocity
        // should stay close to 5 rather than chasing the jitter.
        let mut rng = StdRng::seed_from_u64(7);
        let mut model = SamplingMotionModel::new(10, 1.0, 0.0, 0.0);
        let dt = 1.0 / 60.0;
        for i in 0..120 {
            let t = i as f32 * dt;
            let jitter = Vec2::new(rng.gen_range(-0.05..0.05), rng.gen_range(-0.05..0.05));
            model.add_point_and_update(t, Vec2::new(5.0 * t, 0.0) + jitter);
        }
        let v = model.velocity();
        assert!(
            (v.x - 5.0).abs() < 1.5,
            "smoothed velocity should track the trend, got {:?}",
            v
        );
    }
}
