//! Configuration records.
//!
//! These are the tunable sets a garage preset selects. They are plain data
//! with serde derives; `validate` rejects values the simulation cannot run
//! with, and the vehicle tunables are clamped into their ranges.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{require_non_negative, require_positive, ConfigError};

/// Vehicle tuning template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleConfig {
    /// Motor torque at full throttle (N·m).
    pub max_motor_force: f64,
    /// Brake torque applied to every wheel (N·m).
    pub brake_force: f64,
    /// Front wheel steer angle at full lock (degrees).
    pub max_steer_angle: f64,
    /// Speed above which forward torque is cut (km/h).
    pub max_speed: f64,
    /// Throttle response curve, carried for presets and UI.
    pub acceleration_curve: f64,
    /// Extra downward acceleration applied every tick (m/s²).
    pub additional_gravity: f64,
    /// Rear grip multiplier, lower means looser rear end. [0.2, 2.0]
    pub drift_factor: f64,
    /// Base tire grip. [0.1, 2.0]
    pub grip_factor: f64,
    /// Slip angle (degrees) above which the car is drifting. [5, 50]
    pub drift_angle_threshold: f64,
    /// Extra rear grip multiplier while turning at speed. [0.1, 1.0]
    pub turn_grip_factor: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_motor_force: 3000.0,
            brake_force: 5000.0,
            max_steer_angle: 45.0,
            max_speed: 200.0,
            acceleration_curve: 0.5,
            additional_gravity: 20.0,
            drift_factor: 0.8,
            grip_factor: 1.0,
            drift_angle_threshold: 15.0,
            turn_grip_factor: 0.5,
        }
    }
}

impl VehicleConfig {
    pub fn set_grip_factor(&mut self, value: f64) {
        self.grip_factor = clamp_range(value, GRIP_FACTOR_RANGE);
    }

    pub fn set_drift_factor(&mut self, value: f64) {
        self.drift_factor = clamp_range(value, DRIFT_FACTOR_RANGE);
    }

    pub fn set_drift_angle_threshold(&mut self, value: f64) {
        self.drift_angle_threshold = clamp_range(value, DRIFT_ANGLE_THRESHOLD_RANGE);
    }

    pub fn set_turn_grip_factor(&mut self, value: f64) {
        self.turn_grip_factor = clamp_range(value, TURN_GRIP_FACTOR_RANGE);
    }

    /// Copy with every ranged tunable clamped into its range.
    pub fn clamped(mut self) -> Self {
        self.set_grip_factor(self.grip_factor);
        self.set_drift_factor(self.drift_factor);
        self.set_drift_angle_threshold(self.drift_angle_threshold);
        self.set_turn_grip_factor(self.turn_grip_factor);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("max_motor_force", self.max_motor_force)?;
        require_non_negative("brake_force", self.brake_force)?;
        require_non_negative("max_steer_angle", self.max_steer_angle)?;
        require_positive("max_speed", self.max_speed)?;
        require_non_negative("additional_gravity", self.additional_gravity)?;
        for (field, value) in [
            ("drift_factor", self.drift_factor),
            ("grip_factor", self.grip_factor),
            ("drift_angle_threshold", self.drift_angle_threshold),
            ("turn_grip_factor", self.turn_grip_factor),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        Ok(())
    }
}

/// Clamp into an inclusive range. NaN collapses to the lower bound.
fn clamp_range(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_nan() {
        lo
    } else {
        value.clamp(lo, hi)
    }
}

/// Weapon (gun) configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    /// Muzzle speed (m/s).
    pub projectile_speed: f64,
    /// Visual/hit size multiplier.
    pub projectile_size: f64,
    pub projectile_mass: f64,
    pub damage: u32,
    /// Cooldown between shots (seconds).
    pub fire_rate: f64,
    /// Energy per shot. `None` derives it from speed and size.
    #[serde(default)]
    pub energy_cost_per_shot: Option<f64>,
    /// Auto-turret engages targets within this distance (m).
    pub auto_fire_distance: f64,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            projectile_speed: 20.0,
            projectile_size: 1.0,
            projectile_mass: 1.0,
            damage: 10,
            fire_rate: 0.2,
            energy_cost_per_shot: None,
            auto_fire_distance: 50.0,
        }
    }
}

impl WeaponConfig {
    /// Energy debited per shot.
    pub fn energy_cost(&self) -> f64 {
        match self.energy_cost_per_shot {
            Some(cost) if cost >= 0.0 => cost,
            _ => {
                self.projectile_speed * ENERGY_COST_PER_SPEED
                    + self.projectile_size * ENERGY_COST_PER_SIZE
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("projectile_speed", self.projectile_speed)?;
        require_positive("projectile_size", self.projectile_size)?;
        require_non_negative("fire_rate", self.fire_rate)?;
        require_non_negative("auto_fire_distance", self.auto_fire_distance)?;
        if let Some(cost) = self.energy_cost_per_shot {
            if !cost.is_finite() {
                return Err(ConfigError::InvalidValue {
                    field: "energy_cost_per_shot",
                    value: cost,
                });
            }
        }
        Ok(())
    }
}

/// Battery and engine-off behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyConfig {
    pub capacity: f64,
    pub initial: f64,
    pub consumption_factor: f64,
    pub deceleration_factor: f64,
    pub recharge_rate: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            capacity: BATTERY_CAPACITY,
            initial: BATTERY_CAPACITY,
            consumption_factor: BATTERY_CONSUMPTION_FACTOR,
            deceleration_factor: ENGINE_OFF_DECELERATION,
            recharge_rate: CHARGING_RATE,
        }
    }
}

impl EnergyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("capacity", self.capacity)?;
        require_non_negative("initial", self.initial)?;
        require_non_negative("consumption_factor", self.consumption_factor)?;
        require_non_negative("deceleration_factor", self.deceleration_factor)?;
        require_non_negative("recharge_rate", self.recharge_rate)
    }
}

/// Enemy behaviour tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    /// Within this distance the enemy stops and shoots (m).
    pub attack_range: f64,
    /// Within this distance a patrolling enemy starts following (m).
    pub player_detection_range: f64,
    /// Beyond this distance a following/attacking enemy gives up (m).
    pub lose_player_range: f64,
    /// Radius around the spawn origin for patrol points (m).
    pub patrol_radius: f64,
    /// Navigation speed of the agent (m/s).
    pub move_speed: f64,
    /// Refuse to fire through obstacles.
    pub require_line_of_sight: bool,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            attack_range: 10.0,
            player_detection_range: 25.0,
            lose_player_range: 35.0,
            patrol_radius: 20.0,
            move_speed: 6.0,
            require_line_of_sight: true,
        }
    }
}

impl EnemyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("attack_range", self.attack_range)?;
        require_positive("player_detection_range", self.player_detection_range)?;
        require_positive("lose_player_range", self.lose_player_range)?;
        require_non_negative("patrol_radius", self.patrol_radius)?;
        require_positive("move_speed", self.move_speed)?;
        if !(self.attack_range < self.player_detection_range
            && self.player_detection_range <= self.lose_player_range)
        {
            return Err(ConfigError::RangeOrder {
                attack: self.attack_range,
                detection: self.player_detection_range,
                lose: self.lose_player_range,
            });
        }
        Ok(())
    }
}

/// Spherical obstacle blocking line of sight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub center: DVec3,
    pub radius: f64,
}

/// Configuration for starting a new arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// RNG seed for determinism. Same seed = same run.
    pub seed: u64,
    pub arena_radius: f64,
    pub gravity: f64,
    pub vehicle: VehicleConfig,
    pub player_weapon: WeaponConfig,
    pub energy: EnergyConfig,
    pub enemy: EnemyConfig,
    pub enemy_weapon: WeaponConfig,
    pub player_spawn: DVec3,
    pub enemy_spawns: Vec<DVec3>,
    pub obstacles: Vec<ObstacleConfig>,
    /// Player chassis mass (kg).
    pub vehicle_mass: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            arena_radius: ARENA_RADIUS,
            gravity: GRAVITY,
            vehicle: VehicleConfig::default(),
            player_weapon: WeaponConfig {
                projectile_speed: 40.0,
                ..WeaponConfig::default()
            },
            energy: EnergyConfig::default(),
            enemy: EnemyConfig::default(),
            enemy_weapon: WeaponConfig {
                projectile_speed: 25.0,
                fire_rate: 1.0,
                ..WeaponConfig::default()
            },
            player_spawn: DVec3::ZERO,
            enemy_spawns: vec![
                DVec3::new(40.0, 0.0, 40.0),
                DVec3::new(-45.0, 0.0, 30.0),
                DVec3::new(0.0, 0.0, -60.0),
            ],
            obstacles: vec![ObstacleConfig {
                center: DVec3::new(20.0, 1.0, 20.0),
                radius: 3.0,
            }],
            vehicle_mass: 1200.0,
        }
    }
}

impl ArenaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("arena_radius", self.arena_radius)?;
        require_non_negative("gravity", self.gravity)?;
        require_positive("vehicle_mass", self.vehicle_mass)?;
        self.vehicle.validate()?;
        self.player_weapon.validate()?;
        self.energy.validate()?;
        self.enemy.validate()?;
        self.enemy_weapon.validate()
    }
}
