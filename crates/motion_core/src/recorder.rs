//! The recording/playback state machine.
//!
//! `MotionRecorder` owns the live body, the pen path of raw input
//! samples, the recorded history, and the playback time index. Each
//! frame the host calls [`MotionRecorder::tick`]; while recording the
//! active submode moves the body and a snapshot is appended, while
//! playing back the nearest recorded snapshot is applied instead.
//!
//! We pretend there is a virtual pen drawing the path the entity
//! should follow: it is "down" while the user drags the entity
//! directly, and the most recent pen point always holds the current
//! target regardless.

use bevy::log::{debug, info};
use bevy::math::Vec2;
use std::collections::VecDeque;

use crate::body::MotionBody;
use crate::config::EngineConfig;
use crate::derivative::{estimate_derivative, TimeValueSample};
use crate::history::{StateHistory, StateSnapshot};
use crate::notify::{EngineNotification, NotificationHub, StateKey};
use crate::pool::{Pool, Poolable};
use crate::sampling::SamplingMotionModel;
use crate::time_index::TimeIndex;

/// One raw input sample on the pen path.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PathSample {
    pub time: f32,
    pub x: f32,
    pub y: f32,
}

impl Poolable for PathSample {
    fn reinit(&mut self) {
        *self = Self::default();
    }
}

/// Manual motion-generation strategy while recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    #[default]
    Position,
    Velocity,
    Acceleration,
}

/// Whether the body is driven by user input or by an external preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionType {
    #[default]
    Manual,
    Automatic,
}

/// External collaborator supplying automatic trajectories. Invoked
/// once per recording frame while the motion type is
/// [`MotionType::Automatic`].
pub trait MotionDriver: Send + Sync {
    fn update(&mut self, body: &mut MotionBody, time: f32, dt: f32);
}

/// The record/playback engine.
pub struct MotionRecorder {
    config: EngineConfig,
    body: MotionBody,

    sampling: SamplingMotionModel,
    pen_path: VecDeque<Box<PathSample>>,
    sample_pool: Pool<PathSample>,
    pen_down: bool,
    pen_point: Vec2,

    history: StateHistory,
    index: TimeIndex,
    notifier: NotificationHub,
    driver: Option<Box<dyn MotionDriver>>,

    time: f32,
    furthest_recorded_time: f32,
    recording: bool,
    paused: bool,
    update_mode: UpdateMode,
    motion_type: MotionType,

    bounds_min: Vec2,
    bounds_max: Vec2,

    // Reusable derivative-estimation buffers, zero-filled at the head
    // when history is shorter than the window.
    x_series: Vec<TimeValueSample>,
    y_series: Vec<TimeValueSample>,
}

impl Default for MotionRecorder {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl MotionRecorder {
    pub fn new(config: EngineConfig) -> Self {
        let sampling =
            SamplingMotionModel::new(config.sample_window, config.scale_divisor, 0.0, 0.0);
        let series = vec![TimeValueSample::default(); config.estimation_samples.max(2)];
        Self {
            body: MotionBody::default(),
            sampling,
            pen_path: VecDeque::new(),
            sample_pool: Pool::new(),
            pen_down: false,
            pen_point: Vec2::ZERO,
            history: StateHistory::new(),
            index: TimeIndex::new(),
            notifier: NotificationHub::new(),
            driver: None,
            time: 0.0,
            furthest_recorded_time: 0.0,
            recording: true,
            paused: true,
            update_mode: UpdateMode::default(),
            motion_type: MotionType::default(),
            bounds_min: Vec2::ZERO,
            bounds_max: Vec2::ZERO,
            x_series: series.clone(),
            y_series: series,
            config,
        }
    }

    // ------------------------------------------------------------------
    // Per-frame update
    // ------------------------------------------------------------------

    /// Advance one frame. A no-op while paused; scrubbing while paused
    /// goes through [`MotionRecorder::scrub_to`] instead.
    ///
    /// A recording tick records the pen sample and runs the motion
    /// submode before snapshotting, so the snapshot reflects the fully
    /// updated state for the frame.
    pub fn tick(&mut self, time: f32, dt: f32) {
        if self.paused {
            return;
        }
        self.set_time_internal(time);

        if self.recording {
            if self.motion_type == MotionType::Automatic {
                if let Some(driver) = self.driver.as_mut() {
                    driver.update(&mut self.body, time, dt);
                }
            }

            self.record_pen_point();
            if self.motion_type == MotionType::Manual {
                self.update_manual(dt);
            }

            self.history.record_state(self.time, &self.body);
            self.index.invalidate();
            self.set_furthest_recorded_time(time);
            self.notifier.send(EngineNotification::HistoryAdded);

            if time >= self.config.max_recording_time {
                info!("recording reached {}s cap, pausing", self.config.max_recording_time);
                self.pause();
            }
        } else {
            self.apply_playback_state();
            if time >= self.furthest_recorded_time {
                self.pause();
            }
        }
    }

    /// Convenience for frame-loop hosts: tick with the engine's own
    /// clock advanced by `dt`.
    pub fn advance(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        let next = self.time + dt;
        self.tick(next, dt);
    }

    fn update_manual(&mut self, dt: f32) {
        // Direct dragging always drives by position, whatever submode
        // is selected.
        let mode = if self.pen_down {
            UpdateMode::Position
        } else {
            self.update_mode
        };
        match mode {
            UpdateMode::Position => self.update_position_mode(),
            UpdateMode::Velocity => self.update_velocity_mode(dt),
            UpdateMode::Acceleration => self.update_acceleration_mode(dt),
        }
        self.point_in_direction_of_motion();
    }

    fn update_position_mode(&mut self) {
        self.feed_last_sample();
        if self.pen_path.len() >= 3 {
            self.body.set_position(self.sampling.average_mid());
            self.body
                .set_velocity(self.sampling.velocity() * self.config.velocity_scale);
            self.body
                .set_acceleration(self.sampling.acceleration() * self.config.acceleration_scale);
        } else {
            self.body.set_velocity(Vec2::ZERO);
            self.body.set_acceleration(Vec2::ZERO);
        }
    }

    fn update_velocity_mode(&mut self, dt: f32) {
        // Keep the smoothing window warm so a switch back to position
        // mode stays continuous.
        self.feed_last_sample();
        self.body.integrate_position(dt);
        let acceleration = self.estimate_acceleration();
        self.body.set_acceleration(acceleration);
    }

    fn update_acceleration_mode(&mut self, dt: f32) {
        self.body.integrate_position(dt);
        self.body.integrate_velocity(dt);
    }

    fn feed_last_sample(&mut self) {
        let last = self
            .pen_path
            .back()
            .map(|sample| (sample.time, Vec2::new(sample.x, sample.y)));
        if let Some((time, point)) = last {
            self.sampling.add_point_and_update(time, point);
        }
    }

    /// Rotate the body toward its estimated direction of motion, but
    /// only when it is actually moving.
    fn point_in_direction_of_motion(&mut self) {
        let velocity = self.estimate_velocity();
        if velocity.length() > self.config.heading_epsilon {
            self.body.set_heading(velocity.to_angle());
        }
    }

    // ------------------------------------------------------------------
    // Derivative estimation over recorded states
    // ------------------------------------------------------------------

    /// Velocity estimated from the tail of the recorded positions.
    pub fn estimate_velocity(&mut self) -> Vec2 {
        self.fill_series_from_history(false);
        Vec2::new(
            estimate_derivative(&self.x_series),
            estimate_derivative(&self.y_series),
        )
    }

    /// Acceleration estimated from the tail of the recorded
    /// velocities.
    pub fn estimate_acceleration(&mut self) -> Vec2 {
        self.fill_series_from_history(true);
        Vec2::new(
            estimate_derivative(&self.x_series),
            estimate_derivative(&self.y_series),
        )
    }

    fn fill_series_from_history(&mut self, from_velocity: bool) {
        let window = self.x_series.len();
        let available = self.history.len();
        let take = available.min(window);
        let pad = window - take;

        for slot in 0..pad {
            self.x_series[slot] = TimeValueSample::default();
            self.y_series[slot] = TimeValueSample::default();
        }
        let start = available - take;
        for offset in 0..take {
            let snapshot = self.history.get(start + offset);
            let source = if from_velocity {
                snapshot.velocity
            } else {
                snapshot.position
            };
            self.x_series[pad + offset] = TimeValueSample::new(snapshot.time, source.x);
            self.y_series[pad + offset] = TimeValueSample::new(snapshot.time, source.y);
        }
    }

    // ------------------------------------------------------------------
    // Sampling (pen) input
    // ------------------------------------------------------------------

    /// Begin treating raw input as authoritative (drag start). The
    /// sample window restarts from the body's current position.
    pub fn start_sampling(&mut self) {
        self.pen_down = true;
        self.clear_pen_path();
        self.reset_sampling_model();
    }

    /// Stop treating raw input as authoritative (drag end).
    pub fn stop_sampling(&mut self) {
        self.pen_down = false;
    }

    /// Whether raw input is currently authoritative.
    pub fn sampling(&self) -> bool {
        self.pen_down
    }

    /// Set the current raw pointer position.
    pub fn set_sample_point(&mut self, x: f32, y: f32) {
        self.pen_point = Vec2::new(x, y);
    }

    /// Vector form of [`MotionRecorder::set_sample_point`].
    pub fn set_sample_point_from_vec(&mut self, point: Vec2) {
        self.pen_point = point;
    }

    fn record_pen_point(&mut self) {
        let mut sample = self.sample_pool.acquire();
        sample.time = self.time;
        sample.x = self.pen_point.x;
        sample.y = self.pen_point.y;
        self.pen_path.push_back(sample);

        while self.pen_path.len() > self.config.max_pen_path {
            if let Some(oldest) = self.pen_path.pop_front() {
                self.sample_pool.release(oldest);
            }
        }
    }

    fn clear_pen_path(&mut self) {
        while let Some(sample) = self.pen_path.pop_front() {
            self.sample_pool.release(sample);
        }
    }

    fn reset_sampling_model(&mut self) {
        self.sampling.reset(self.body.position());
    }

    // ------------------------------------------------------------------
    // State machine commands
    // ------------------------------------------------------------------

    /// Switch between writing history and replaying it. Leaving
    /// recording builds the time index so scrubbing works immediately.
    /// Re-entering recording truncates history at the current time, so
    /// the next written snapshot cannot land behind stale future
    /// entries left by a scrub.
    pub fn set_recording(&mut self, recording: bool) {
        if self.recording == recording {
            return;
        }
        self.recording = recording;
        if recording {
            self.truncate_history_after(self.time);
        } else {
            self.prepare_for_playback();
        }
        self.notifier
            .send(EngineNotification::StateChanged(StateKey::Recording));
    }

    /// Stop advancing time. Also prepares the index so the host can
    /// scrub straight away.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.prepare_for_playback();
        self.notifier
            .send(EngineNotification::StateChanged(StateKey::Paused));
    }

    /// Resume advancing time. Resuming a recording mid-history
    /// truncates the stale future left by a scrub before writing.
    pub fn play(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        if self.recording {
            self.truncate_history_after(self.time);
        } else {
            self.prepare_for_playback();
        }
        self.notifier
            .send(EngineNotification::StateChanged(StateKey::Paused));
    }

    /// Jump to an arbitrary recorded instant. Out-of-range times clamp
    /// to the recorded range.
    pub fn scrub_to(&mut self, time: f32) {
        let clamped = time.clamp(0.0, self.furthest_recorded_time);
        self.set_time_internal(clamped);
        self.apply_playback_state();
    }

    /// Jump back to time zero. While recording this discards the
    /// previous run entirely.
    pub fn rewind(&mut self) {
        self.set_time_internal(0.0);
        self.apply_playback_state();
        if self.recording {
            self.clear_history_internal();
            self.set_furthest_recorded_time(0.0);
        }
        self.clear_pen_path();
        self.reset_sampling_model();
    }

    /// Drop all history and restart the clock, leaving the body and
    /// the recording/paused flags as they are.
    pub fn clear(&mut self) {
        info!("clearing recorded history");
        self.set_time_internal(0.0);
        self.set_furthest_recorded_time(0.0);
        self.clear_history_internal();
        self.clear_pen_path();
        self.reset_sampling_model();
    }

    /// Full reset: flags to defaults, history and sampling dropped,
    /// body back at the origin.
    pub fn reset(&mut self) {
        self.set_time_internal(0.0);
        self.set_furthest_recorded_time(0.0);
        self.recording = true;
        self.paused = true;
        self.update_mode = UpdateMode::default();
        self.motion_type = MotionType::default();
        self.clear_history_internal();
        self.clear_pen_path();
        self.pen_point = Vec2::ZERO;
        self.pen_down = false;
        self.body.reset();
        self.reset_sampling_model();
    }

    /// Select the manual motion-generation submode. Entering position
    /// mode restarts sampling so stale drag data cannot lerp the body.
    pub fn set_mode(&mut self, mode: UpdateMode) {
        if self.update_mode == mode {
            return;
        }
        self.update_mode = mode;
        if mode == UpdateMode::Position {
            self.clear_pen_path();
            self.reset_sampling_model();
        }
        self.notifier
            .send(EngineNotification::StateChanged(StateKey::UpdateMode));
    }

    /// Switch between manual control and an automatic preset driver.
    pub fn set_motion_type(&mut self, motion_type: MotionType) {
        if self.motion_type == motion_type {
            return;
        }
        self.motion_type = motion_type;
        if motion_type == MotionType::Manual {
            self.clear_pen_path();
            self.reset_sampling_model();
        }
        self.notifier
            .send(EngineNotification::StateChanged(StateKey::MotionType));
    }

    /// Install the external trajectory driver used while the motion
    /// type is [`MotionType::Automatic`].
    pub fn set_motion_driver(&mut self, driver: Box<dyn MotionDriver>) {
        self.driver = Some(driver);
    }

    /// Host command surface for velocity mode (remote-control style
    /// input): set the body's velocity directly.
    pub fn set_body_velocity(&mut self, velocity: Vec2) {
        self.body.set_velocity(velocity);
    }

    /// Host command surface for acceleration mode: set the body's
    /// acceleration directly.
    pub fn set_body_acceleration(&mut self, acceleration: Vec2) {
        self.body.set_acceleration(acceleration);
    }

    /// Re-center the body at the origin at rest and restart sampling
    /// there.
    pub fn return_to_origin(&mut self) {
        self.body.set_position(Vec2::ZERO);
        self.body.set_velocity(Vec2::ZERO);
        self.clear_pen_path();
        self.pen_point = self.body.position();
        self.reset_sampling_model();
    }

    // ------------------------------------------------------------------
    // Playback internals
    // ------------------------------------------------------------------

    fn prepare_for_playback(&mut self) {
        debug!("building time index over {} snapshots", self.history.len());
        self.index.build(&mut self.history);
    }

    fn apply_playback_state(&mut self) {
        if let Some(found) = self.index.find_closest(self.time) {
            let snapshot = *self.history.get(found);
            snapshot.apply(&mut self.body);
        }
    }

    fn truncate_history_after(&mut self, time: f32) {
        self.history.truncate_after(time);
        self.index.invalidate();
        self.set_furthest_recorded_time(time);
        // A drag resumed over rewritten history must restart from the
        // scrubbed-to position, not lerp from the pre-scrub one.
        if self.pen_down {
            self.clear_pen_path();
            self.reset_sampling_model();
        }
        self.notifier.send(EngineNotification::HistoryRemoved);
    }

    fn clear_history_internal(&mut self) {
        self.history.clear();
        self.index.invalidate();
        self.notifier.send(EngineNotification::HistoryRemoved);
    }

    fn set_time_internal(&mut self, time: f32) {
        self.time = time;
        self.notifier
            .send(EngineNotification::StateChanged(StateKey::Time));
    }

    fn set_furthest_recorded_time(&mut self, time: f32) {
        self.furthest_recorded_time = time;
        self.notifier.send(EngineNotification::StateChanged(
            StateKey::FurthestRecordedTime,
        ));
    }

    // ------------------------------------------------------------------
    // Scene bounds
    // ------------------------------------------------------------------

    /// Bounding box of the play area, for out-of-bounds checks.
    pub fn set_bounds(&mut self, min: Vec2, max: Vec2) {
        self.bounds_min = min;
        self.bounds_max = max;
    }

    pub fn bounds(&self) -> (Vec2, Vec2) {
        (self.bounds_min, self.bounds_max)
    }

    pub fn body_out_of_bounds(&self) -> bool {
        let p = self.body.position();
        p.x < self.bounds_min.x
            || p.y < self.bounds_min.y
            || p.x > self.bounds_max.x
            || p.y > self.bounds_max.y
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    pub fn subscribe(&mut self) -> async_channel::Receiver<EngineNotification> {
        self.notifier.subscribe()
    }

    pub fn body(&self) -> &MotionBody {
        &self.body
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn furthest_recorded_time(&self) -> f32 {
        self.furthest_recorded_time
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn update_mode(&self) -> UpdateMode {
        self.update_mode
    }

    pub fn motion_type(&self) -> MotionType {
        self.motion_type
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn culled_history(&self) -> impl Iterator<Item = &StateSnapshot> + '_ {
        self.history.culled()
    }

    pub fn culled_history_len(&self) -> usize {
        self.history.culled_len()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
