//! Fundamental geometric and simulation types.
//!
//! Vectors are glam `DVec3` in world space (meters, m/s).
//! y = Up, z = vehicle forward at identity rotation, x = right.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// World position and orientation of a rigid body or wheel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: DVec3,
    pub rotation: DQuat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: DVec3, rotation: DQuat) -> Self {
        Self { position, rotation }
    }

    /// Unit forward vector (+z rotated by the pose orientation).
    pub fn forward(&self) -> DVec3 {
        self.rotation * DVec3::Z
    }

    /// Yaw in radians, 0 = +z, positive turning toward +x.
    pub fn yaw(&self) -> f64 {
        let f = self.forward();
        f.x.atan2(f.z)
    }
}

/// Normalized driver input for one physics step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverInput {
    /// Steering axis in [-1, 1], positive = right.
    pub steer: f64,
    /// Throttle axis in [-1, 1], negative = reverse.
    pub throttle: f64,
    pub brake: bool,
}

impl DriverInput {
    /// Build an input with both axes clamped to [-1, 1].
    pub fn new(steer: f64, throttle: f64, brake: bool) -> Self {
        Self {
            steer: clamp_axis(steer),
            throttle: clamp_axis(throttle),
            brake,
        }
    }

    /// All-zero input, used while the vehicle is unpowered.
    pub fn idle() -> Self {
        Self::default()
    }
}

fn clamp_axis(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Position and velocity of something that can be aimed at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    pub position: DVec3,
    pub velocity: DVec3,
}

impl TargetState {
    pub fn new(position: DVec3, velocity: DVec3) -> Self {
        Self { position, velocity }
    }

    pub fn stationary(position: DVec3) -> Self {
        Self::new(position, DVec3::ZERO)
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the fixed physics rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs = self.tick as f64 * self.dt();
    }
}

/// Component of `v` in the horizontal (xz) plane.
pub fn horizontal(v: DVec3) -> DVec3 {
    DVec3::new(v.x, 0.0, v.z)
}

/// Unsigned angle between two vectors in degrees, 0 when either is zero.
pub fn angle_between_deg(a: DVec3, b: DVec3) -> f64 {
    let denom = (a.length_squared() * b.length_squared()).sqrt();
    if denom < 1e-15 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}
