//! Engine tuning constants.

/// Configuration for the record/playback engine.
///
/// The scale constants are visual calibration knobs, not physical
/// invariants: the sampling model already reports estimates in world
/// units per second, so unity scales are a sensible default.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of raw input samples in the smoothing window
    pub sample_window: usize,
    /// Calibration divisor applied to the sampling model's velocity
    /// and acceleration estimates
    pub scale_divisor: f32,
    /// Multiplier from smoothed velocity to the body's velocity
    pub velocity_scale: f32,
    /// Multiplier from smoothed acceleration to the body's acceleration
    pub acceleration_scale: f32,
    /// Recording stops (pauses) once the clock reaches this (seconds)
    pub max_recording_time: f32,
    /// Maximum pen path length; oldest samples are evicted first
    pub max_pen_path: usize,
    /// Window length for the derivative estimator over recorded states
    pub estimation_samples: usize,
    /// Speeds below this do not update the body's heading
    pub heading_epsilon: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_window: 10,
            scale_divisor: 1.0,
            velocity_scale: 1.0,
            acceleration_scale: 1.0,
            max_recording_time: 20.0,
            max_pen_path: 100,
            estimation_samples: 10,
            heading_epsilon: 1e-6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = EngineConfig::default();
        assert_eq!(config.sample_window, 10, "sample_window should be 10");
        assert_eq!(config.max_pen_path, 100, "max_pen_path should be 100");
        assert_eq!(
            config.max_recording_time, 20.0,
            "max_recording_time should be 20 seconds"
        );
        assert_eq!(config.velocity_scale, 1.0);
        assert_eq!(config.acceleration_scale, 1.0);
    }
}
