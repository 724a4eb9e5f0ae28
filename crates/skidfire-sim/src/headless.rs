//! Headless collaborators.
//!
//! Minimal engine stand-ins so the arena runs and tests without a game
//! engine: an arcade kinematic chassis, a straight-line navigation agent on a
//! flat disk, and sphere obstacles for line-of-sight checks.

use glam::{DQuat, DVec3};

use skidfire_core::collaborators::{LineOfSight, NavigationAgent, PhysicsBody, WheelCommand};
use skidfire_core::config::ObstacleConfig;
use skidfire_core::constants::GROUND_Y;
use skidfire_core::enums::WheelPosition;
use skidfire_core::types::{horizontal, Pose};

/// Wheel radius used to turn torque into drive force (m).
const WHEEL_RADIUS: f64 = 0.35;

/// Distance between front and rear axles (m).
const WHEELBASE: f64 = 2.6;

/// Half of the track width (m).
const HALF_TRACK: f64 = 0.8;

/// Lateral slip decay per unit of sideways stiffness (1/s).
const LATERAL_GRIP_RATE: f64 = 6.0;

/// Below this forward speed the chassis does not yaw (m/s).
const MIN_STEER_SPEED: f64 = 0.1;

/// Arcade rigid-body chassis on a flat ground plane.
///
/// Drive follows a kinematic bicycle model: motor and brake torques act along
/// the heading, yaw rate comes from the front steer angle, and sideways slip
/// decays at a rate set by the rear sideways stiffness.
#[derive(Debug, Clone)]
pub struct KinematicBody {
    position: DVec3,
    yaw: f64,
    linear_velocity: DVec3,
    angular_velocity: DVec3,
    mass: f64,
    linear_damping: f64,
    angular_damping: f64,
    center_of_mass: DVec3,
    force: DVec3,
    wheels: [Option<WheelCommand>; 4],
}

impl KinematicBody {
    pub fn new(position: DVec3, mass: f64) -> Self {
        Self {
            position,
            yaw: 0.0,
            linear_velocity: DVec3::ZERO,
            angular_velocity: DVec3::ZERO,
            mass,
            linear_damping: 0.0,
            angular_damping: 0.0,
            center_of_mass: DVec3::ZERO,
            force: DVec3::ZERO,
            wheels: [None; 4],
        }
    }

    pub fn with_yaw(mut self, yaw: f64) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn set_yaw(&mut self, yaw: f64) {
        self.yaw = yaw;
    }

    pub fn center_of_mass(&self) -> DVec3 {
        self.center_of_mass
    }

    pub fn damping(&self) -> (f64, f64) {
        (self.linear_damping, self.angular_damping)
    }

    /// Last command applied to a wheel.
    pub fn wheel_command(&self, wheel: WheelPosition) -> Option<&WheelCommand> {
        self.wheels[wheel.index()].as_ref()
    }

    fn rotation(&self) -> DQuat {
        DQuat::from_rotation_y(self.yaw)
    }

    fn wheel_sum(&self, f: impl Fn(&WheelCommand) -> f64) -> f64 {
        self.wheels.iter().flatten().map(f).sum()
    }

    fn front_steer_deg(&self) -> f64 {
        let front: Vec<f64> = [WheelPosition::FrontLeft, WheelPosition::FrontRight]
            .iter()
            .filter_map(|w| self.wheels[w.index()].map(|c| c.steer_angle))
            .collect();
        if front.is_empty() {
            0.0
        } else {
            front.iter().sum::<f64>() / front.len() as f64
        }
    }

    fn rear_sideways_stiffness(&self) -> f64 {
        let rear: Vec<f64> = [WheelPosition::RearLeft, WheelPosition::RearRight]
            .iter()
            .filter_map(|w| self.wheels[w.index()].map(|c| c.sideways_stiffness))
            .collect();
        if rear.is_empty() {
            1.0
        } else {
            rear.iter().sum::<f64>() / rear.len() as f64
        }
    }

    /// Integrate one step under `gravity` and clear the accumulated force.
    pub fn step(&mut self, dt: f64, gravity: f64) {
        let forward = self.rotation() * DVec3::Z;
        let right = self.rotation() * DVec3::X;

        let mut forward_speed = self.linear_velocity.dot(forward);
        let mut lateral_speed = self.linear_velocity.dot(right);
        let mut vertical_speed = self.linear_velocity.y;

        // Drive and brake along the heading.
        if self.mass > 0.0 {
            let drive = self.wheel_sum(|c| c.motor_torque) / WHEEL_RADIUS;
            forward_speed += drive / self.mass * dt;

            let brake = self.wheel_sum(|c| c.brake_torque) / WHEEL_RADIUS;
            let brake_dv = brake / self.mass * dt;
            forward_speed = if forward_speed.abs() <= brake_dv {
                0.0
            } else {
                forward_speed - brake_dv * forward_speed.signum()
            };

            vertical_speed += (self.force.y / self.mass - gravity) * dt;
        }

        // Tire slip decays with sideways stiffness.
        lateral_speed *= (-self.rear_sideways_stiffness() * LATERAL_GRIP_RATE * dt).exp();

        // Yaw from the front steer angle.
        let steer = self.front_steer_deg().to_radians();
        let yaw_rate = if forward_speed.abs() > MIN_STEER_SPEED {
            forward_speed * steer.tan() / WHEELBASE
        } else {
            0.0
        };
        self.angular_velocity.y = yaw_rate;

        self.linear_velocity =
            forward * forward_speed + right * lateral_speed + DVec3::Y * vertical_speed;
        self.linear_velocity /= 1.0 + dt * self.linear_damping;
        self.angular_velocity /= 1.0 + dt * self.angular_damping;

        self.position += self.linear_velocity * dt;
        self.yaw += self.angular_velocity.y * dt;

        if self.position.y <= GROUND_Y {
            self.position.y = GROUND_Y;
            self.linear_velocity.y = self.linear_velocity.y.max(0.0);
        }
        self.force = DVec3::ZERO;
    }
}

impl PhysicsBody for KinematicBody {
    fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation())
    }

    fn linear_velocity(&self) -> DVec3 {
        self.linear_velocity
    }

    fn angular_velocity(&self) -> DVec3 {
        self.angular_velocity
    }

    fn set_linear_velocity(&mut self, velocity: DVec3) {
        self.linear_velocity = velocity;
    }

    fn set_angular_velocity(&mut self, velocity: DVec3) {
        self.angular_velocity = velocity;
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn add_force(&mut self, force: DVec3) {
        self.force += force;
    }

    fn configure_body(&mut self, linear_damping: f64, angular_damping: f64, center_of_mass: DVec3) {
        self.linear_damping = linear_damping;
        self.angular_damping = angular_damping;
        self.center_of_mass = center_of_mass;
    }

    fn apply_wheel(&mut self, wheel: WheelPosition, command: &WheelCommand) {
        self.wheels[wheel.index()] = Some(*command);
    }

    fn wheel_pose(&self, wheel: WheelPosition) -> Pose {
        let x = match wheel {
            WheelPosition::FrontLeft | WheelPosition::RearLeft => -HALF_TRACK,
            WheelPosition::FrontRight | WheelPosition::RearRight => HALF_TRACK,
        };
        let z = if wheel.is_front() {
            WHEELBASE / 2.0
        } else {
            -WHEELBASE / 2.0
        };
        let body = self.rotation();
        let position = self.position + body * DVec3::new(x, WHEEL_RADIUS, z);
        let steer = self.wheels[wheel.index()]
            .map(|c| c.steer_angle.to_radians())
            .unwrap_or(0.0);
        Pose::new(position, body * DQuat::from_rotation_y(steer))
    }
}

/// Straight-line navigation on a flat disk, blocked by sphere obstacles.
#[derive(Debug, Clone)]
pub struct KinematicAgent {
    position: DVec3,
    speed: f64,
    arena_radius: f64,
    obstacles: Vec<ObstacleConfig>,
    destination: Option<DVec3>,
    stopped: bool,
    enabled: bool,
    facing: DVec3,
    velocity: DVec3,
}

impl KinematicAgent {
    pub fn new(position: DVec3, speed: f64, arena_radius: f64) -> Self {
        Self {
            position,
            speed,
            arena_radius,
            obstacles: Vec::new(),
            destination: None,
            stopped: false,
            enabled: true,
            facing: DVec3::Z,
            velocity: DVec3::ZERO,
        }
    }

    pub fn with_obstacles(mut self, obstacles: Vec<ObstacleConfig>) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn destination(&self) -> Option<DVec3> {
        self.destination
    }

    pub fn facing(&self) -> DVec3 {
        self.facing
    }

    /// Velocity over the last step.
    pub fn velocity(&self) -> DVec3 {
        self.velocity
    }

    fn inside_obstacle(&self, point: DVec3) -> bool {
        self.obstacles
            .iter()
            .any(|o| horizontal(point - o.center).length() < o.radius)
    }

    fn on_surface(&self, point: DVec3) -> bool {
        horizontal(point).length() <= self.arena_radius && !self.inside_obstacle(point)
    }

    /// Move toward the destination. A step that would enter an obstacle is refused.
    pub fn step(&mut self, dt: f64) {
        self.velocity = DVec3::ZERO;
        if !self.enabled || self.stopped {
            return;
        }
        let Some(destination) = self.destination else {
            return;
        };
        let to_go = horizontal(destination - self.position);
        let distance = to_go.length();
        let step = self.speed * dt;
        if distance <= step {
            if dt > 0.0 {
                self.velocity = to_go / dt;
            }
            self.position = DVec3::new(destination.x, self.position.y, destination.z);
            self.destination = None;
            return;
        }
        let direction = to_go / distance;
        let next = self.position + direction * step;
        if self.inside_obstacle(next) {
            return;
        }
        self.position = next;
        self.facing = direction;
        self.velocity = direction * self.speed;
    }
}

impl NavigationAgent for KinematicAgent {
    fn position(&self) -> DVec3 {
        self.position
    }

    fn set_destination(&mut self, destination: DVec3) -> bool {
        if !self.enabled {
            return false;
        }
        match self.sample_reachable(destination, self.arena_radius) {
            Some(point) => {
                self.destination = Some(point);
                true
            }
            None => {
                self.destination = None;
                false
            }
        }
    }

    fn has_path(&self) -> bool {
        self.enabled && self.destination.is_some()
    }

    fn remaining_distance(&self) -> f64 {
        match self.destination {
            Some(destination) if self.enabled => horizontal(destination - self.position).length(),
            _ => 0.0,
        }
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn resume(&mut self) {
        self.stopped = false;
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.destination = None;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn sample_reachable(&self, point: DVec3, max_distance: f64) -> Option<DVec3> {
        let flat = DVec3::new(point.x, self.position.y, point.z);
        let radial = horizontal(flat).length();
        let projected = if radial > self.arena_radius {
            let edge = horizontal(flat) / radial * self.arena_radius;
            DVec3::new(edge.x, self.position.y, edge.z)
        } else {
            flat
        };
        if projected.distance(flat) > max_distance || !self.on_surface(projected) {
            return None;
        }
        Some(projected)
    }

    fn face(&mut self, direction: DVec3) {
        if let Some(dir) = horizontal(direction).try_normalize() {
            self.facing = dir;
        }
    }
}

/// Sphere obstacles blocking sight lines.
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    obstacles: Vec<ObstacleConfig>,
}

impl ObstacleField {
    pub fn new(obstacles: Vec<ObstacleConfig>) -> Self {
        Self { obstacles }
    }

    pub fn obstacles(&self) -> &[ObstacleConfig] {
        &self.obstacles
    }
}

impl LineOfSight for ObstacleField {
    fn is_clear(&self, from: DVec3, to: DVec3) -> bool {
        let segment = to - from;
        let length_sq = segment.length_squared();
        self.obstacles.iter().all(|o| {
            let t = if length_sq > 0.0 {
                ((o.center - from).dot(segment) / length_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let closest = from + segment * t;
            closest.distance(o.center) > o.radius
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use skidfire_core::collaborators::SuspensionSettings;

    fn command(motor: f64, steer: f64) -> WheelCommand {
        WheelCommand {
            motor_torque: motor,
            brake_torque: 0.0,
            steer_angle: steer,
            forward_stiffness: 2.0,
            sideways_stiffness: 1.0,
            suspension: SuspensionSettings {
                spring: 50_000.0,
                damper: 4_500.0,
                distance: 0.1,
            },
        }
    }

    #[test]
    fn test_body_accelerates_forward_under_torque() {
        let mut body = KinematicBody::new(DVec3::ZERO, 1000.0);
        for wheel in WheelPosition::ALL {
            body.apply_wheel(wheel, &command(500.0, 0.0));
        }
        for _ in 0..50 {
            body.step(0.02, 9.81);
        }
        assert!(body.linear_velocity().z > 1.0);
        assert!(body.pose().position.z > 0.0);
        assert_relative_eq!(body.pose().position.y, 0.0);
    }

    #[test]
    fn test_body_turns_toward_steer() {
        let mut body = KinematicBody::new(DVec3::ZERO, 1000.0);
        body.set_linear_velocity(DVec3::new(0.0, 0.0, 10.0));
        for wheel in WheelPosition::ALL {
            let steer = if wheel.is_front() { 20.0 } else { 0.0 };
            body.apply_wheel(wheel, &command(0.0, steer));
        }
        body.step(0.02, 9.81);
        assert!(body.pose().yaw() > 0.0, "positive steer turns right");
    }

    #[test]
    fn test_body_stays_on_ground() {
        let mut body = KinematicBody::new(DVec3::new(0.0, 2.0, 0.0), 1000.0);
        body.add_force(DVec3::NEG_Y * 20_000.0);
        for _ in 0..100 {
            body.step(0.02, 9.81);
        }
        assert_eq!(body.pose().position.y, 0.0);
        assert!(body.linear_velocity().y >= 0.0);
    }

    #[test]
    fn test_agent_walks_to_destination() {
        let mut agent = KinematicAgent::new(DVec3::ZERO, 5.0, 100.0);
        assert!(agent.set_destination(DVec3::new(10.0, 0.0, 0.0)));
        assert_relative_eq!(agent.remaining_distance(), 10.0);
        for _ in 0..150 {
            agent.step(0.02);
        }
        assert!(!agent.has_path());
        assert_relative_eq!(agent.position().x, 10.0);
    }

    #[test]
    fn test_agent_stop_and_disable() {
        let mut agent = KinematicAgent::new(DVec3::ZERO, 5.0, 100.0);
        agent.set_destination(DVec3::new(10.0, 0.0, 0.0));
        agent.stop();
        agent.step(0.5);
        assert_eq!(agent.position(), DVec3::ZERO);

        agent.resume();
        agent.set_enabled(false);
        assert!(!agent.has_path());
        assert!(!agent.set_destination(DVec3::X));
    }

    #[test]
    fn test_agent_blocked_by_obstacle() {
        let obstacle = ObstacleConfig {
            center: DVec3::new(3.0, 0.0, 0.0),
            radius: 1.0,
        };
        let mut agent = KinematicAgent::new(DVec3::ZERO, 5.0, 100.0).with_obstacles(vec![obstacle]);
        assert!(agent.set_destination(DVec3::new(10.0, 0.0, 0.0)));
        for _ in 0..100 {
            agent.step(0.02);
        }
        assert!(agent.position().x < 2.0);
        assert!(agent.has_path());
    }

    #[test]
    fn test_sample_reachable() {
        let obstacle = ObstacleConfig {
            center: DVec3::new(3.0, 0.0, 0.0),
            radius: 1.0,
        };
        let agent = KinematicAgent::new(DVec3::ZERO, 5.0, 50.0).with_obstacles(vec![obstacle]);
        assert!(agent.sample_reachable(DVec3::new(3.0, 0.0, 0.0), 5.0).is_none());
        let edge = agent.sample_reachable(DVec3::new(52.0, 0.0, 0.0), 5.0).unwrap();
        assert_relative_eq!(edge.x, 50.0);
        assert!(agent.sample_reachable(DVec3::new(80.0, 0.0, 0.0), 5.0).is_none());
    }

    #[test]
    fn test_obstacle_field_line_of_sight() {
        let field = ObstacleField::new(vec![ObstacleConfig {
            center: DVec3::new(0.0, 1.0, 10.0),
            radius: 2.0,
        }]);
        let from = DVec3::new(0.0, 1.0, 0.0);
        assert!(!field.is_clear(from, DVec3::new(0.0, 1.0, 20.0)));
        assert!(field.is_clear(from, DVec3::new(0.0, 1.0, 5.0)));
        assert!(field.is_clear(from, DVec3::new(20.0, 1.0, 0.0)));
    }
}
