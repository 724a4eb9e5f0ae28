//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::Faction;

/// World position (m).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position(pub DVec3);

/// World velocity (m/s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub DVec3);

/// Marker and id for an enemy entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub enemy_id: u32,
}

/// A projectile in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Who fired it. Projectiles only hit the opposing faction.
    pub faction: Faction,
    /// Seconds since launch.
    pub age_secs: f64,
    pub lifetime_secs: f64,
    pub hit_radius: f64,
}
