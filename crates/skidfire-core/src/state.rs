//! Arena snapshot: the complete visible state handed to the host each tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{Pose, SimTime};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub vehicle: VehicleTelemetry,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    /// Events emitted during this tick.
    pub events: Vec<SimEvent>,
}

/// What the HUD reads from the player car.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleTelemetry {
    pub pose: Pose,
    pub velocity: DVec3,
    /// Speed in km/h.
    pub speed_kmh: f64,
    pub is_drifting: bool,
    pub is_powered: bool,
    pub is_charging: bool,
    pub battery_level: f64,
    pub battery_capacity: f64,
    pub wheels: Vec<WheelView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelView {
    pub wheel: WheelPosition,
    pub pose: Pose,
    pub motor_torque: f64,
    pub brake_torque: f64,
    pub steer_angle: f64,
    pub forward_stiffness: f64,
    pub sideways_stiffness: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub enemy_id: u32,
    pub position: DVec3,
    pub state: EnemyState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub faction: Faction,
    pub position: DVec3,
    pub velocity: DVec3,
}
