//! Bevy integration: the engine as a resource driven by frame time.

use bevy::prelude::*;

use crate::config::EngineConfig;
use crate::recorder::MotionRecorder;

/// The record/playback engine wrapped as a Bevy resource. Systems
/// reach the recorder through `Deref`/`DerefMut`.
#[derive(Resource, Default)]
pub struct MotionEngine {
    pub recorder: MotionRecorder,
}

impl MotionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            recorder: MotionRecorder::new(config),
        }
    }
}

impl std::ops::Deref for MotionEngine {
    type Target = MotionRecorder;

    fn deref(&self) -> &Self::Target {
        &self.recorder
    }
}

impl std::ops::DerefMut for MotionEngine {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.recorder
    }
}

/// Installs [`MotionEngine`] and ticks it from the frame clock every
/// update.
#[derive(Default)]
pub struct MotionEnginePlugin {
    pub config: EngineConfig,
}

impl Plugin for MotionEnginePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(MotionEngine::new(self.config.clone()))
            .add_systems(Update, advance_motion_engine);
    }
}

/// Advance the engine by the frame delta. A paused engine ignores the
/// call, so wall-clock time spent paused never leaks into the
/// recording.
pub fn advance_motion_engine(time: Res<Time>, mut engine: ResMut<MotionEngine>) {
    engine.advance(time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_resource_starts_paused() {
        let engine = MotionEngine::new(EngineConfig::default());
        assert!(engine.is_paused());
        assert!(engine.is_recording());
    }

    #[test]
    fn test_deref_reaches_recorder() {
        let mut engine = MotionEngine::default();
        engine.play();
        engine.tick(0.1, 0.1);
        assert_eq!(engine.history_len(), 1);
    }
}
