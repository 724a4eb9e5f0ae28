//! The player car: vehicle dynamics wired to a battery and an auto-turret.

use glam::DVec3;
use tracing::{error, info};

use skidfire_core::collaborators::{EnergySource, PhysicsBody};
use skidfire_core::config::{EnergyConfig, VehicleConfig, WeaponConfig};
use skidfire_core::constants::PLAYER_MUZZLE_HEIGHT;
use skidfire_core::enums::PowerTransition;
use skidfire_core::error::ConfigError;
use skidfire_core::events::SimEvent;
use skidfire_core::state::VehicleTelemetry;
use skidfire_core::types::{DriverInput, TargetState};

use crate::battery::{Battery, PowerMonitor};
use crate::targeting::{closest_target, Shot, TargetingController};
use crate::vehicle::VehicleDynamics;

/// Builds a [`PlayerCar`]. The body and vehicle config are required; the
/// battery and weapon are optional.
pub struct PlayerCarBuilder<B> {
    body: Option<B>,
    vehicle: Option<VehicleConfig>,
    energy: Option<EnergyConfig>,
    weapon: Option<WeaponConfig>,
    gravity: f64,
}

impl<B: PhysicsBody> PlayerCarBuilder<B> {
    pub fn body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    pub fn vehicle_config(mut self, config: VehicleConfig) -> Self {
        self.vehicle = Some(config);
        self
    }

    pub fn battery(mut self, config: EnergyConfig) -> Self {
        self.energy = Some(config);
        self
    }

    pub fn weapon(mut self, config: WeaponConfig, gravity: f64) -> Self {
        self.weapon = Some(config);
        self.gravity = gravity;
        self
    }

    pub fn build(self) -> Result<PlayerCar<B>, ConfigError> {
        let body = self.body.ok_or_else(|| {
            error!("player car built without a physics body");
            ConfigError::MissingReference("physics body")
        })?;
        let config = self.vehicle.ok_or_else(|| {
            error!("player car built without a vehicle config");
            ConfigError::MissingReference("vehicle config")
        })?;

        let mut vehicle = VehicleDynamics::new(body, config)?;
        let battery = match self.energy {
            Some(energy) => {
                energy.validate()?;
                vehicle.set_deceleration_factor(energy.deceleration_factor);
                Some(Battery::from_config(&energy))
            }
            None => None,
        };
        let weapon = self
            .weapon
            .map(|config| TargetingController::new(config, self.gravity))
            .transpose()?;
        let power = battery
            .as_ref()
            .map(|b| PowerMonitor::new(b))
            .unwrap_or_default();

        let mut car = PlayerCar {
            vehicle,
            battery,
            power,
            weapon,
            recharge_rate: self.energy.map(|e| e.recharge_rate).unwrap_or(0.0),
            charging: false,
        };
        // A car built with an empty battery starts unpowered.
        if car.battery.as_ref().is_some_and(|b| b.is_empty()) {
            car.vehicle.set_powered(false);
            if let Some(weapon) = car.weapon.as_mut() {
                weapon.set_enabled(false);
            }
        }
        Ok(car)
    }
}

pub struct PlayerCar<B: PhysicsBody> {
    vehicle: VehicleDynamics<B>,
    battery: Option<Battery>,
    power: PowerMonitor,
    weapon: Option<TargetingController>,
    recharge_rate: f64,
    charging: bool,
}

impl<B: PhysicsBody> PlayerCar<B> {
    pub fn builder() -> PlayerCarBuilder<B> {
        PlayerCarBuilder {
            body: None,
            vehicle: None,
            energy: None,
            weapon: None,
            gravity: 0.0,
        }
    }

    /// One fixed step: drive, drain while accelerating, recharge in a zone,
    /// then react to any power edge.
    pub fn fixed_step(&mut self, input: DriverInput, dt: f64, events: &mut Vec<SimEvent>) {
        self.vehicle.fixed_step(input, dt, events);

        if let Some(battery) = self.battery.as_mut() {
            if self.vehicle.is_accelerating() {
                let speed = self.vehicle.body().linear_velocity().length();
                battery.drain_for_motion(speed, dt);
            }
            if self.charging {
                battery.recharge(self.recharge_rate * dt);
            }
        }
        self.sync_power(events);
    }

    /// Engage the closest candidate within the weapon's auto-fire distance.
    ///
    /// Aims with lead and fires at the intercept point. Returns the target
    /// key and the shot when one was fired.
    pub fn auto_fire<K: Copy>(
        &mut self,
        now: f64,
        candidates: impl IntoIterator<Item = (K, TargetState)>,
        events: &mut Vec<SimEvent>,
    ) -> Option<(K, Shot)> {
        let weapon = self.weapon.as_mut()?;
        let muzzle = self.vehicle.body().pose().position + DVec3::Y * PLAYER_MUZZLE_HEIGHT;
        weapon.set_muzzle_position(muzzle);

        let (key, target) = closest_target(muzzle, candidates, weapon.config().auto_fire_distance)?;
        let aim_point = weapon.aim_at_moving_target(&target);
        let energy = self.battery.as_mut().map(|b| b as &mut dyn EnergySource);
        let shot = weapon.try_fire(now, aim_point, energy, None);
        self.sync_power(events);
        shot.map(|shot| (key, shot))
    }

    /// Poll the battery and apply an empty/non-empty edge exactly once.
    fn sync_power(&mut self, events: &mut Vec<SimEvent>) {
        let Some(battery) = self.battery.as_ref() else {
            return;
        };
        let Some(transition) = self.power.poll(battery) else {
            return;
        };
        let powered = transition == PowerTransition::Restored;
        self.vehicle.set_powered(powered);
        if let Some(weapon) = self.weapon.as_mut() {
            weapon.set_enabled(powered);
        }
        info!(?transition, level = battery.level(), "battery power edge");
        events.push(match transition {
            PowerTransition::Lost => SimEvent::PowerLost,
            PowerTransition::Restored => SimEvent::PowerRestored,
        });
    }

    pub fn set_charging(&mut self, charging: bool) {
        self.charging = charging;
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    pub fn apply_weapon_config(&mut self, config: WeaponConfig) -> Result<(), ConfigError> {
        match self.weapon.as_mut() {
            Some(weapon) => weapon.set_config(config),
            None => Err(ConfigError::MissingReference("weapon")),
        }
    }

    pub fn telemetry(&self) -> VehicleTelemetry {
        let body = self.vehicle.body();
        VehicleTelemetry {
            pose: body.pose(),
            velocity: body.linear_velocity(),
            speed_kmh: self.vehicle.speed_kmh(),
            is_drifting: self.vehicle.is_drifting(),
            is_powered: self.vehicle.is_powered(),
            is_charging: self.charging,
            battery_level: self.battery.as_ref().map_or(0.0, |b| b.level()),
            battery_capacity: self.battery.as_ref().map_or(0.0, |b| b.capacity()),
            wheels: self.vehicle.wheel_views(),
        }
    }

    /// Current position and velocity, for enemies to aim at.
    pub fn target_state(&self) -> TargetState {
        let body = self.vehicle.body();
        TargetState::new(body.pose().position, body.linear_velocity())
    }

    pub fn vehicle(&self) -> &VehicleDynamics<B> {
        &self.vehicle
    }

    pub fn vehicle_mut(&mut self) -> &mut VehicleDynamics<B> {
        &mut self.vehicle
    }

    pub fn battery(&self) -> Option<&Battery> {
        self.battery.as_ref()
    }

    pub fn battery_mut(&mut self) -> Option<&mut Battery> {
        self.battery.as_mut()
    }

    pub fn weapon(&self) -> Option<&TargetingController> {
        self.weapon.as_ref()
    }
}
