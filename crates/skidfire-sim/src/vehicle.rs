//! Arcade vehicle dynamics.
//!
//! `VehicleDynamics` drives a [`PhysicsBody`] once per fixed step: it turns
//! driver input into per-wheel torque, brake and steer commands, keeps the
//! wheel friction in step with the grip tunables, pushes the car down with
//! extra gravity, and tracks the drift flag. It holds no physics state of its
//! own; velocity and pose always come from the body.

use glam::DVec3;
use tracing::{debug, info};

use skidfire_core::collaborators::{PhysicsBody, SuspensionSettings, WheelCommand};
use skidfire_core::config::VehicleConfig;
use skidfire_core::constants::*;
use skidfire_core::enums::WheelPosition;
use skidfire_core::error::ConfigError;
use skidfire_core::events::SimEvent;
use skidfire_core::state::WheelView;
use skidfire_core::types::{angle_between_deg, DriverInput, Pose};

use crate::scheduler::{Delay, Scheduler};

#[derive(Debug, Clone, Copy, PartialEq)]
enum VehicleTimer {
    BoostRevert,
}

const SUSPENSION: SuspensionSettings = SuspensionSettings {
    spring: SUSPENSION_SPRING,
    damper: SUSPENSION_DAMPER,
    distance: SUSPENSION_DISTANCE,
};

pub struct VehicleDynamics<B: PhysicsBody> {
    body: B,
    config: VehicleConfig,
    /// Extra motor force from an active boost. Never folded into `config`.
    boost_force: f64,
    scheduler: Scheduler<VehicleTimer>,
    wheels: [WheelCommand; 4],
    wheel_poses: [Pose; 4],
    input: DriverInput,
    speed_kmh: f64,
    is_drifting: bool,
    is_powered: bool,
    turn_grip_active: bool,
    deceleration_factor: f64,
}

impl<B: PhysicsBody> VehicleDynamics<B> {
    /// Take ownership of the body, set it up and configure all four wheels.
    pub fn new(mut body: B, config: VehicleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let [x, y, z] = VEHICLE_CENTER_OF_MASS;
        body.configure_body(
            VEHICLE_LINEAR_DAMPING,
            VEHICLE_ANGULAR_DAMPING,
            DVec3::new(x, y, z),
        );

        let idle_wheel = WheelCommand {
            motor_torque: 0.0,
            brake_torque: 0.0,
            steer_angle: 0.0,
            forward_stiffness: 0.0,
            sideways_stiffness: 0.0,
            suspension: SUSPENSION,
        };
        let mut vehicle = Self {
            body,
            config: config.clamped(),
            boost_force: 0.0,
            scheduler: Scheduler::new(),
            wheels: [idle_wheel; 4],
            wheel_poses: [Pose::default(); 4],
            input: DriverInput::idle(),
            speed_kmh: 0.0,
            is_drifting: false,
            is_powered: true,
            turn_grip_active: false,
            deceleration_factor: ENGINE_OFF_DECELERATION,
        };
        vehicle.configure_wheels();
        Ok(vehicle)
    }

    /// Swap in a new tunable set and re-derive wheel grip immediately.
    pub fn apply_configuration(&mut self, config: VehicleConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config.clamped();
        self.configure_wheels();
        info!(
            grip = self.config.grip_factor,
            drift = self.config.drift_factor,
            motor = self.config.max_motor_force,
            "vehicle configuration applied"
        );
        Ok(())
    }

    pub fn set_grip_factor(&mut self, value: f64) {
        self.config.set_grip_factor(value);
        self.configure_wheels();
    }

    pub fn set_drift_factor(&mut self, value: f64) {
        self.config.set_drift_factor(value);
        self.configure_wheels();
    }

    pub fn set_drift_angle_threshold(&mut self, value: f64) {
        self.config.set_drift_angle_threshold(value);
    }

    pub fn set_turn_grip_factor(&mut self, value: f64) {
        self.config.set_turn_grip_factor(value);
        self.configure_wheels();
    }

    pub fn set_deceleration_factor(&mut self, value: f64) {
        if value.is_finite() {
            self.deceleration_factor = value.max(0.0);
        }
    }

    /// Derive friction and suspension for every wheel from the current config
    /// and push it to the body. Same config in, same stiffness out.
    pub fn configure_wheels(&mut self) {
        for wheel in WheelPosition::ALL {
            let grip = self.wheel_grip(wheel);
            let command = &mut self.wheels[wheel.index()];
            command.forward_stiffness = grip * FORWARD_STIFFNESS_SCALE;
            command.sideways_stiffness = grip * SIDEWAYS_STIFFNESS_SCALE;
            command.suspension = SUSPENSION;
            self.body.apply_wheel(wheel, command);
        }
    }

    fn wheel_grip(&self, wheel: WheelPosition) -> f64 {
        let grip = self.config.grip_factor;
        if wheel.is_front() {
            grip * FRONT_GRIP_MULTIPLIER
        } else if self.turn_grip_active {
            grip * self.config.drift_factor * self.config.turn_grip_factor
        } else {
            grip * self.config.drift_factor
        }
    }

    /// Enable or disable the drivetrain. Losing power cuts all torque at once.
    /// Returns true when the state changed.
    pub fn set_powered(&mut self, powered: bool) -> bool {
        if self.is_powered == powered {
            return false;
        }
        self.is_powered = powered;
        if !powered {
            self.input = DriverInput::idle();
            for wheel in WheelPosition::ALL {
                let command = &mut self.wheels[wheel.index()];
                command.motor_torque = 0.0;
                command.brake_torque = 0.0;
                command.steer_angle = 0.0;
                self.body.apply_wheel(wheel, command);
            }
        }
        info!(powered, "vehicle power changed");
        true
    }

    /// Add `force` to the motor force for `duration_secs`. A boost issued while
    /// another is active replaces it and restarts the timer.
    pub fn apply_boost(&mut self, force: f64, duration_secs: f64, events: &mut Vec<SimEvent>) {
        if !force.is_finite() || !duration_secs.is_finite() || duration_secs <= 0.0 {
            return;
        }
        self.boost_force = force;
        let superseded = self
            .scheduler
            .schedule(VehicleTimer::BoostRevert, Delay::Seconds(duration_secs));
        debug!(force, duration_secs, superseded, "boost applied");
        events.push(SimEvent::BoostStarted {
            force,
            duration_secs,
        });
    }

    /// Run one fixed physics step.
    pub fn fixed_step(&mut self, input: DriverInput, dt: f64, events: &mut Vec<SimEvent>) {
        for due in self.scheduler.advance(dt) {
            match due {
                VehicleTimer::BoostRevert => {
                    self.boost_force = 0.0;
                    events.push(SimEvent::BoostEnded);
                }
            }
        }

        // Input sampling.
        self.input = if self.is_powered {
            input
        } else {
            DriverInput::idle()
        };
        let velocity = self.body.linear_velocity();

        // Motor, brake and steering.
        if self.is_powered {
            let motor_torque =
                self.motor_torque(self.input.throttle, velocity.length() * MS_TO_KMH);
            let brake_torque = if self.input.brake {
                self.config.brake_force
            } else {
                0.0
            };
            let steer_angle = self.config.max_steer_angle * self.input.steer;
            for wheel in WheelPosition::ALL {
                let command = &mut self.wheels[wheel.index()];
                command.motor_torque = motor_torque;
                command.brake_torque = brake_torque;
                command.steer_angle = if wheel.is_front() { steer_angle } else { 0.0 };
                self.body.apply_wheel(wheel, command);
            }
        }

        // Wheel pose readback.
        for wheel in WheelPosition::ALL {
            self.wheel_poses[wheel.index()] = self.body.wheel_pose(wheel);
        }

        self.body
            .add_force(DVec3::NEG_Y * self.config.additional_gravity * self.body.mass());

        // Telemetry.
        self.speed_kmh = velocity.length() * MS_TO_KMH;

        // Drift and grip reassessment.
        if self.is_powered {
            let drifting = self.detect_drift(velocity);
            self.set_drifting(drifting, events);
            let turning = self.input.steer.abs() > TURN_INPUT_THRESHOLD
                && self.speed_kmh > TURN_GRIP_MIN_SPEED_KMH;
            self.set_turn_grip(turning);
        } else {
            self.set_drifting(false, events);
            self.set_turn_grip(false);
            self.coast(dt);
        }
    }

    /// Motor torque for a throttle value at the given speed.
    fn motor_torque(&self, throttle: f64, speed_kmh: f64) -> f64 {
        let force = self.config.max_motor_force + self.boost_force;
        if throttle > 0.0 {
            if speed_kmh >= self.config.max_speed {
                0.0
            } else {
                throttle * force
            }
        } else if throttle < 0.0 {
            throttle * force * REVERSE_TORQUE_FACTOR
        } else {
            0.0
        }
    }

    fn detect_drift(&self, velocity: DVec3) -> bool {
        if velocity.length() <= DRIFT_MIN_SPEED {
            return false;
        }
        let angle = angle_between_deg(self.body.pose().forward(), velocity);
        angle > self.config.drift_angle_threshold
            && self.input.steer.abs() > TURN_INPUT_THRESHOLD
    }

    fn set_drifting(&mut self, drifting: bool, events: &mut Vec<SimEvent>) {
        if drifting == self.is_drifting {
            return;
        }
        self.is_drifting = drifting;
        debug!(drifting, speed_kmh = self.speed_kmh, "drift state changed");
        events.push(if drifting {
            SimEvent::DriftStarted
        } else {
            SimEvent::DriftEnded
        });
    }

    fn set_turn_grip(&mut self, active: bool) {
        if active == self.turn_grip_active {
            return;
        }
        self.turn_grip_active = active;
        for wheel in [WheelPosition::RearLeft, WheelPosition::RearRight] {
            let grip = self.wheel_grip(wheel);
            let command = &mut self.wheels[wheel.index()];
            command.forward_stiffness = grip * FORWARD_STIFFNESS_SCALE;
            command.sideways_stiffness = grip * SIDEWAYS_STIFFNESS_SCALE;
            self.body.apply_wheel(wheel, command);
        }
    }

    /// Engine-off coasting: lerp both velocities toward zero.
    fn coast(&mut self, dt: f64) {
        let t = (self.deceleration_factor * dt).clamp(0.0, 1.0);
        let linear = self.body.linear_velocity();
        let angular = self.body.angular_velocity();
        self.body.set_linear_velocity(linear.lerp(DVec3::ZERO, t));
        self.body.set_angular_velocity(angular.lerp(DVec3::ZERO, t));
    }

    pub fn is_accelerating(&self) -> bool {
        self.is_powered && self.input.throttle.abs() > ACCELERATE_INPUT_THRESHOLD
    }

    pub fn is_drifting(&self) -> bool {
        self.is_drifting
    }

    pub fn is_powered(&self) -> bool {
        self.is_powered
    }

    pub fn is_boosting(&self) -> bool {
        self.scheduler.is_pending(VehicleTimer::BoostRevert)
    }

    /// Motor force including any active boost.
    pub fn effective_motor_force(&self) -> f64 {
        self.config.max_motor_force + self.boost_force
    }

    /// Speed in km/h as of the last step.
    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    pub fn wheel(&self, wheel: WheelPosition) -> &WheelCommand {
        &self.wheels[wheel.index()]
    }

    pub fn wheel_views(&self) -> Vec<WheelView> {
        WheelPosition::ALL
            .iter()
            .map(|&wheel| {
                let command = &self.wheels[wheel.index()];
                WheelView {
                    wheel,
                    pose: self.wheel_poses[wheel.index()],
                    motor_torque: command.motor_torque,
                    brake_torque: command.brake_torque,
                    steer_angle: command.steer_angle,
                    forward_stiffness: command.forward_stiffness,
                    sideways_stiffness: command.sideways_stiffness,
                }
            })
            .collect()
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }
}
