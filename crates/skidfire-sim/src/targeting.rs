//! Targeting controller shared by the player auto-turret and enemy shooters.
//!
//! Aims a muzzle with the ballistic solver and gates each shot on cooldown,
//! optional line of sight and optional energy. A refused shot has no side
//! effects.

use glam::DVec3;
use tracing::debug;

use skidfire_core::collaborators::{EnergySource, LineOfSight};
use skidfire_core::config::WeaponConfig;
use skidfire_core::error::{require_non_negative, ConfigError};
use skidfire_core::types::TargetState;

use crate::ballistics::{solve_intercept_point, solve_launch_direction, solve_launch_velocity};

/// Muzzle position and the direction it currently points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Muzzle {
    pub position: DVec3,
    pub direction: DVec3,
}

impl Default for Muzzle {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            direction: DVec3::Z,
        }
    }
}

/// A projectile launch produced by a successful [`TargetingController::try_fire`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub origin: DVec3,
    pub velocity: DVec3,
    /// False when no ballistic solution existed and the shot went straight
    /// along the muzzle.
    pub ballistic: bool,
    pub energy_spent: f64,
}

#[derive(Debug, Clone)]
pub struct TargetingController {
    config: WeaponConfig,
    gravity: f64,
    muzzle: Muzzle,
    /// Game time at which the next shot is allowed. Only moves forward.
    next_fire_time: f64,
    enabled: bool,
}

impl TargetingController {
    pub fn new(config: WeaponConfig, gravity: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        require_non_negative("gravity", gravity)?;
        Ok(Self {
            config,
            gravity,
            muzzle: Muzzle::default(),
            next_fire_time: 0.0,
            enabled: true,
        })
    }

    /// Swap the weapon. The cooldown already running is kept.
    pub fn set_config(&mut self, config: WeaponConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &WeaponConfig {
        &self.config
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn muzzle(&self) -> Muzzle {
        self.muzzle
    }

    pub fn set_muzzle_position(&mut self, position: DVec3) {
        self.muzzle.position = position;
    }

    /// Energy one shot costs with the current weapon.
    pub fn energy_cost(&self) -> f64 {
        self.config.energy_cost()
    }

    /// Point the muzzle along the ballistic launch direction for `target`, or
    /// straight at it when the target is out of range.
    pub fn aim(&mut self, target: DVec3) {
        let direction = solve_launch_direction(
            self.muzzle.position,
            target,
            self.config.projectile_speed,
            self.gravity,
        )
        .unwrap_or_else(|| (target - self.muzzle.position).normalize_or_zero());
        if direction != DVec3::ZERO {
            self.muzzle.direction = direction;
        }
    }

    /// Lead the target and aim at the predicted intercept point, which is returned.
    pub fn aim_at_moving_target(&mut self, target: &TargetState) -> DVec3 {
        let point = solve_intercept_point(
            self.muzzle.position,
            target.position,
            target.velocity,
            self.config.projectile_speed,
        );
        self.aim(point);
        point
    }

    /// True when enabled and the cooldown has elapsed at `now`.
    pub fn is_ready(&self, now: f64) -> bool {
        self.enabled && now >= self.next_fire_time
    }

    /// Fire one projectile at `target` if every gate passes.
    ///
    /// Gates, in order: enabled and cooldown elapsed, line of sight (when a
    /// checker is given), energy (when a source is given and the shot costs
    /// anything). On success energy is debited and the cooldown restarts.
    pub fn try_fire(
        &mut self,
        now: f64,
        target: DVec3,
        energy: Option<&mut dyn EnergySource>,
        line_of_sight: Option<&dyn LineOfSight>,
    ) -> Option<Shot> {
        if !self.is_ready(now) {
            return None;
        }
        if let Some(los) = line_of_sight {
            if !los.is_clear(self.muzzle.position, target) {
                return None;
            }
        }

        let cost = self.energy_cost();
        let mut energy_spent = 0.0;
        if let Some(source) = energy {
            if cost > 0.0 {
                if !source.try_consume(cost) {
                    return None;
                }
                energy_spent = cost;
            }
        }

        let speed = self.config.projectile_speed;
        let (velocity, ballistic) =
            match solve_launch_velocity(self.muzzle.position, target, speed, self.gravity) {
                Some(v) => (v, true),
                None => (self.muzzle.direction * speed, false),
            };
        self.next_fire_time = now + self.config.fire_rate;
        debug!(?velocity, ballistic, energy_spent, "shot fired");

        Some(Shot {
            origin: self.muzzle.position,
            velocity,
            ballistic,
            energy_spent,
        })
    }
}

/// The closest candidate within `max_distance` of `origin`.
pub fn closest_target<K>(
    origin: DVec3,
    candidates: impl IntoIterator<Item = (K, TargetState)>,
    max_distance: f64,
) -> Option<(K, TargetState)> {
    candidates
        .into_iter()
        .map(|(key, target)| (origin.distance(target.position), key, target))
        .filter(|(distance, _, _)| *distance <= max_distance)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key, target)| (key, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use skidfire_core::constants::GRAVITY;

    use crate::battery::Battery;

    struct Wall;

    impl LineOfSight for Wall {
        fn is_clear(&self, _from: DVec3, _to: DVec3) -> bool {
            false
        }
    }

    fn gun() -> TargetingController {
        let config = WeaponConfig {
            projectile_speed: 30.0,
            fire_rate: 0.5,
            energy_cost_per_shot: Some(5.0),
            ..WeaponConfig::default()
        };
        TargetingController::new(config, GRAVITY).unwrap()
    }

    #[test]
    fn test_cooldown_gates_shots() {
        let mut gun = gun();
        let target = DVec3::new(0.0, 0.0, 20.0);
        assert!(gun.try_fire(0.0, target, None, None).is_some());
        assert!(gun.try_fire(0.2, target, None, None).is_none());
        assert!(gun.try_fire(0.49, target, None, None).is_none());
        assert!(gun.try_fire(0.5, target, None, None).is_some());
    }

    #[test]
    fn test_energy_debited_once_per_shot() {
        let mut gun = gun();
        let mut battery = Battery::new(100.0, 12.0, 0.5);
        let target = DVec3::new(0.0, 0.0, 20.0);

        let shot = gun.try_fire(0.0, target, Some(&mut battery), None).unwrap();
        assert_eq!(shot.energy_spent, 5.0);
        assert_relative_eq!(battery.level(), 7.0);

        gun.try_fire(1.0, target, Some(&mut battery), None).unwrap();
        assert_relative_eq!(battery.level(), 2.0);

        // Not enough left: refused without touching the battery or the cooldown.
        assert!(gun.try_fire(2.0, target, Some(&mut battery), None).is_none());
        assert_relative_eq!(battery.level(), 2.0);
        assert!(gun.is_ready(2.0));
    }

    #[test]
    fn test_blocked_line_of_sight_refuses_without_side_effects() {
        let mut gun = gun();
        let mut battery = Battery::new(100.0, 100.0, 0.5);
        let target = DVec3::new(0.0, 0.0, 20.0);
        assert!(gun
            .try_fire(0.0, target, Some(&mut battery), Some(&Wall))
            .is_none());
        assert_eq!(battery.level(), 100.0);
        assert!(gun.is_ready(0.0));
    }

    #[test]
    fn test_disabled_gun_never_fires() {
        let mut gun = gun();
        gun.set_enabled(false);
        assert!(gun.try_fire(10.0, DVec3::Z * 10.0, None, None).is_none());
        gun.set_enabled(true);
        assert!(gun.try_fire(10.0, DVec3::Z * 10.0, None, None).is_some());
    }

    #[test]
    fn test_shot_velocity_is_ballistic_when_reachable() {
        let mut gun = gun();
        let shot = gun
            .try_fire(0.0, DVec3::new(50.0, 0.0, 0.0), None, None)
            .unwrap();
        assert!(shot.ballistic);
        assert_relative_eq!(shot.velocity.length(), 30.0, epsilon = 1e-9);
        assert!(shot.velocity.y > 0.0);
    }

    #[test]
    fn test_unreachable_target_falls_back_to_muzzle_direction() {
        let mut gun = gun();
        let far = DVec3::new(1000.0, 0.0, 0.0);
        gun.aim(far);
        assert_relative_eq!(gun.muzzle().direction.x, 1.0, epsilon = 1e-12);

        let shot = gun.try_fire(0.0, far, None, None).unwrap();
        assert!(!shot.ballistic);
        assert_relative_eq!(shot.velocity.x, 30.0, epsilon = 1e-12);
    }

    #[test]
    fn test_aim_at_moving_target_returns_lead_point() {
        let mut gun = gun();
        let target = TargetState::new(DVec3::new(0.0, 0.0, 30.0), DVec3::new(10.0, 0.0, 0.0));
        let point = gun.aim_at_moving_target(&target);
        assert!(point.x > 0.0, "aims ahead of a target moving +x");
        assert_relative_eq!(point.z, 30.0);

        let still = TargetState::stationary(DVec3::new(5.0, 0.0, 5.0));
        assert_eq!(gun.aim_at_moving_target(&still), still.position);
    }

    #[test]
    fn test_zero_cost_weapon_does_not_touch_battery() {
        let config = WeaponConfig {
            energy_cost_per_shot: Some(0.0),
            ..WeaponConfig::default()
        };
        let mut gun = TargetingController::new(config, GRAVITY).unwrap();
        let mut battery = Battery::new(10.0, 0.0, 0.5);
        assert!(gun
            .try_fire(0.0, DVec3::Z * 5.0, Some(&mut battery), None)
            .is_some());
    }

    #[test]
    fn test_closest_target_respects_distance() {
        let candidates = vec![
            (1u32, TargetState::stationary(DVec3::new(30.0, 0.0, 0.0))),
            (2, TargetState::stationary(DVec3::new(0.0, 0.0, 12.0))),
            (3, TargetState::stationary(DVec3::new(80.0, 0.0, 0.0))),
        ];
        let (id, _) = closest_target(DVec3::ZERO, candidates.clone(), 50.0).unwrap();
        assert_eq!(id, 2);
        assert!(closest_target(DVec3::ZERO, candidates, 10.0).is_none());
    }

    #[test]
    fn test_invalid_weapon_rejected() {
        let config = WeaponConfig {
            projectile_speed: 0.0,
            ..WeaponConfig::default()
        };
        assert!(TargetingController::new(config, GRAVITY).is_err());
    }
}
