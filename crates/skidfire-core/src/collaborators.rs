//! Capability traits for engine-owned resources.
//!
//! The simulation never owns a physics engine, navigation mesh or scene.
//! It is handed implementations of these traits instead, so the same
//! controllers run inside a game engine or against the headless
//! implementations in `skidfire-sim` during tests.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::WheelPosition;
use crate::types::Pose;

/// Suspension spring settings for one wheel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuspensionSettings {
    pub spring: f64,
    pub damper: f64,
    pub distance: f64,
}

/// Everything the vehicle commands on a single wheel each step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelCommand {
    pub motor_torque: f64,
    pub brake_torque: f64,
    /// Steer angle in degrees, positive = right.
    pub steer_angle: f64,
    pub forward_stiffness: f64,
    pub sideways_stiffness: f64,
    pub suspension: SuspensionSettings,
}

/// The chassis rigid body plus its wheel solver.
pub trait PhysicsBody {
    fn pose(&self) -> Pose;
    fn linear_velocity(&self) -> DVec3;
    fn angular_velocity(&self) -> DVec3;
    fn set_linear_velocity(&mut self, velocity: DVec3);
    fn set_angular_velocity(&mut self, velocity: DVec3);
    fn mass(&self) -> f64;

    /// Continuous force applied over the current step (N).
    fn add_force(&mut self, force: DVec3);

    /// One-time body setup (damping and center of mass).
    fn configure_body(&mut self, linear_damping: f64, angular_damping: f64, center_of_mass: DVec3);

    fn apply_wheel(&mut self, wheel: WheelPosition, command: &WheelCommand);

    /// World pose of a wheel as solved by the engine.
    fn wheel_pose(&self, wheel: WheelPosition) -> Pose;
}

/// A navigation-mesh agent.
pub trait NavigationAgent {
    fn position(&self) -> DVec3;

    /// Request a path to `destination`. Returns false when no path exists.
    fn set_destination(&mut self, destination: DVec3) -> bool;

    fn has_path(&self) -> bool;

    /// Distance left along the current path (m). Zero without a path.
    fn remaining_distance(&self) -> f64;

    fn stop(&mut self);
    fn resume(&mut self);
    fn is_stopped(&self) -> bool;

    /// Disabling drops the current path; re-enabling leaves it empty.
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;

    /// Nearest point on the navigation surface within `max_distance`.
    fn sample_reachable(&self, point: DVec3, max_distance: f64) -> Option<DVec3>;

    /// Turn the agent body to face `direction` (horizontal only).
    fn face(&mut self, direction: DVec3);
}

/// Scene raycasts used for occlusion checks.
pub trait LineOfSight {
    /// True when nothing but the target lies on the segment `from`..`to`.
    fn is_clear(&self, from: DVec3, to: DVec3) -> bool;
}

/// A rechargeable energy store.
pub trait EnergySource {
    /// Debit `amount` if at least that much is stored.
    fn try_consume(&mut self, amount: f64) -> bool;
    fn recharge(&mut self, amount: f64);
    fn is_empty(&self) -> bool;
    fn level(&self) -> f64;
    fn capacity(&self) -> f64;
}
