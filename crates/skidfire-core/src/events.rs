//! Events emitted by the simulation for UI, audio and diagnostics.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// Battery crossed from non-empty to empty.
    PowerLost,
    /// Battery crossed from empty to non-empty.
    PowerRestored,
    DriftStarted,
    DriftEnded,
    BoostStarted { force: f64, duration_secs: f64 },
    BoostEnded,
    /// A new vehicle tunable set was applied.
    VehicleConfigApplied,
    WeaponConfigApplied,
    ShotFired {
        faction: Faction,
        origin: DVec3,
        velocity: DVec3,
    },
    ProjectileHit {
        faction: Faction,
        /// Enemy id for player hits, `None` when the player was hit.
        enemy_id: Option<u32>,
        position: DVec3,
    },
    EnemyStateChanged {
        enemy_id: u32,
        from: EnemyState,
        to: EnemyState,
    },
    /// Stuck recovery reissued an enemy's navigation.
    PathReset { enemy_id: u32 },
}
