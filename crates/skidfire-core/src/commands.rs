//! Commands sent from the host (garage UI, pickups, trigger zones) to the arena.
//!
//! Commands are queued and applied at the next tick boundary, so a tunable
//! never changes in the middle of a physics step.

use serde::{Deserialize, Serialize};

use crate::config::{VehicleConfig, WeaponConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Arena control ---
    StartArena,
    Pause,
    Resume,

    // --- Garage ---
    /// Hot-swap the whole vehicle tunable set.
    ApplyVehicleConfig { config: VehicleConfig },
    /// Hot-swap the player gun.
    ApplyWeaponConfig { config: WeaponConfig },
    SetGripFactor { value: f64 },
    SetDriftFactor { value: f64 },
    SetDriftAngleThreshold { value: f64 },
    SetTurnGripFactor { value: f64 },

    // --- Pickups and zones ---
    /// Temporarily raise motor force.
    ApplyBoost { force: f64, duration_secs: f64 },
    EnterChargingZone,
    ExitChargingZone,
}
