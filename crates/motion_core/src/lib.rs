//! Record-and-playback motion engine for a single 2D body.
//!
//! This crate provides:
//! - A kinematic body with position, velocity, acceleration, heading
//! - Sliding-window smoothing of raw drag input
//! - Least-squares derivative estimation over timed samples
//! - Recorded state history with a culled trail for display
//! - Binary-search scrubbing of recorded time
//! - A recording/playback state machine with change notifications
//! - A Bevy plugin that drives the engine from the frame clock

pub mod body;
pub mod config;
pub mod derivative;
pub mod history;
pub mod notify;
pub mod plugin;
pub mod pool;
pub mod recorder;
pub mod sampling;
pub mod time_index;

pub use body::MotionBody;
pub use config::EngineConfig;
pub use derivative::{estimate_derivative, TimeValueSample};
pub use history::{StateHistory, StateSnapshot};
pub use notify::{EngineNotification, NotificationHub, StateKey};
pub use plugin::{advance_motion_engine, MotionEngine, MotionEnginePlugin};
pub use pool::{Pool, Poolable};
pub use recorder::{MotionDriver, MotionRecorder, MotionType, PathSample, UpdateMode};
pub use sampling::SamplingMotionModel;
pub use time_index::TimeIndex;
