//! Derivative estimation over a short, possibly padded time series.
//!
//! The recorder keeps fixed-length reusable buffers for the position
//! and velocity series; when fewer real samples exist than the buffer
//! length, the head of the buffer is zero-filled. The estimator must
//! ignore those placeholders so a short history never produces a
//! spurious slope.

/// One scalar sample of a time series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeValueSample {
    pub time: f32,
    pub value: f32,
}

impl TimeValueSample {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }

    /// Zero-filled padding entries have both fields at exactly zero.
    fn is_placeholder(&self) -> bool {
        self.time == 0.0 && self.value == 0.0
    }
}

/// Least-squares slope of `value` over `time`.
///
/// Placeholder entries are skipped. Fewer than two real samples, or a
/// window whose timestamps are all (nearly) identical, yields 0.
pub fn estimate_derivative(series: &[TimeValueSample]) -> f32 {
    let mut count = 0usize;
    let mut sum_t = 0.0f32;
    let mut sum_v = 0.0f32;
    for sample in series {
        if sample.is_placeholder() {
            continue;
        }
        count += 1;
        sum_t += sample.time;
        sum_v += sample.value;
    }
    if count < 2 {
        return 0.0;
    }

    let mean_t = sum_t / count as f32;
    let mean_v = sum_v / count as f32;

    let mut numerator = 0.0f32;
    let mut denominator = 0.0f32;
    for sample in series {
        if sample.is_placeholder() {
            continue;
        }
        let dt = sample.time - mean_t;
        numerator += dt * (sample.value - mean_v);
        denominator += dt * dt;
    }

    if denominator <= f32::EPSILON {
        return 0.0;
    }
    numerator / denominator
}
