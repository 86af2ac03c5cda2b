//! Kinematic state of the tracked entity.
//!
//! The body is a fixed struct of typed fields with explicit setters;
//! it is owned by the recorder and mutated either by the live motion
//! submodes (while recording) or by snapshot application (playback).

use bevy::math::Vec2;

/// Full kinematic state of the moving entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionBody {
    position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    /// Facing direction in radians, measured from +X.
    heading: f32,
}

impl Default for MotionBody {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            heading: 0.0,
        }
    }
}

impl MotionBody {
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn set_acceleration(&mut self, acceleration: Vec2) {
        self.acceleration = acceleration;
    }

    pub fn set_heading(&mut self, heading: f32) {
        self.heading = heading;
    }

    /// Euler step of position from the current velocity.
    pub fn integrate_position(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    /// Euler step of velocity from the current acceleration.
    pub fn integrate_velocity(&mut self, dt: f32) {
        self.velocity += self.acceleration * dt;
    }

    /// Return the body to the origin at rest, facing +X.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_position() {
        let mut body = MotionBody::default();
        body.set_velocity(Vec2::new(2.0, -1.0));
        body.integrate_position(0.5);
        assert_eq!(body.position(), Vec2::new(1.0, -0.5));
    }

    #[test]
    fn test_integrate_velocity() {
        let mut body = MotionBody::default();
        body.set_acceleration(Vec2::new(0.0, -9.8));
        body.integrate_velocity(1.0);
        assert_eq!(body.velocity(), Vec2::new(0.0, -9.8));
    }

    #[test]
    fn test_reset_returns_to_defaults() {
        let mut body = MotionBody::default();
        body.set_position(Vec2::new(3.0, 4.0));
        body.set_heading(1.2);
        body.reset();
        assert_eq!(body, MotionBody::default());
    }
}
