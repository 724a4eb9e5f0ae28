//! Closed-form ballistic solutions.
//!
//! Launch velocity for a static point under gravity (low arc only) and the
//! lead intercept point for a target moving at constant velocity. Pure
//! functions, no hidden state: identical inputs give identical outputs.

use glam::DVec3;

use skidfire_core::types::horizontal;

/// Horizontal distances below this are treated as straight up/down.
const MIN_HORIZONTAL_DISTANCE: f64 = 1e-6;

/// Quadratic coefficients below this are treated as zero.
const QUADRATIC_EPSILON: f64 = 1e-9;

/// Launch velocity that hits `target` from `origin` at muzzle `speed`.
///
/// Returns `None` when the target is out of range for this speed. Of the two
/// angles solving the range equation the flatter one is always chosen.
pub fn solve_launch_velocity(
    origin: DVec3,
    target: DVec3,
    speed: f64,
    gravity: f64,
) -> Option<DVec3> {
    if !speed.is_finite() || speed <= 0.0 {
        return None;
    }

    let to_target = target - origin;
    if gravity <= 0.0 {
        // No drop: aim straight at it.
        return to_target.try_normalize().map(|dir| dir * speed);
    }

    let flat = horizontal(to_target);
    let d = flat.length();
    let y = to_target.y;

    let speed_sq = speed * speed;
    let discriminant = speed_sq * speed_sq - gravity * (gravity * d * d + 2.0 * y * speed_sq);
    if discriminant < 0.0 {
        return None;
    }

    let angle = (speed_sq - discriminant.sqrt()).atan2(gravity * d);
    let vertical = DVec3::Y * (speed * angle.sin());

    if d < MIN_HORIZONTAL_DISTANCE {
        // Directly above or below: only the vertical component survives.
        return Some(vertical);
    }

    Some(flat / d * (speed * angle.cos()) + vertical)
}

/// Unit launch direction, see [`solve_launch_velocity`].
pub fn solve_launch_direction(
    origin: DVec3,
    target: DVec3,
    speed: f64,
    gravity: f64,
) -> Option<DVec3> {
    solve_launch_velocity(origin, target, speed, gravity).and_then(DVec3::try_normalize)
}

/// Time until a projectile fired now meets a target moving at constant velocity.
///
/// With `d = target − shooter`, solves `(s² − |v|²)t² + 2(d·v)t − |d|² = 0`.
/// Takes the larger root, falling back to the smaller one when the larger is
/// negative. Returns `None` when there is no real root or the chosen root is
/// not strictly positive. Equal speeds reduce to the linear term.
pub fn solve_intercept_time(
    shooter_pos: DVec3,
    target_pos: DVec3,
    target_velocity: DVec3,
    projectile_speed: f64,
) -> Option<f64> {
    let displacement = target_pos - shooter_pos;
    let a = projectile_speed * projectile_speed - target_velocity.length_squared();
    let b = 2.0 * displacement.dot(target_velocity);
    let c = -displacement.length_squared();

    if a.abs() < QUADRATIC_EPSILON {
        // Equal speeds: the equation is linear.
        if b.abs() < QUADRATIC_EPSILON {
            return None;
        }
        let t = -c / b;
        return (t > 0.0).then_some(t);
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b + sqrt_disc) / (2.0 * a);
    let t2 = (-b - sqrt_disc) / (2.0 * a);

    let mut t = t1.max(t2);
    if t < 0.0 {
        t = t1.min(t2);
    }
    (t > 0.0).then_some(t)
}

/// Where to aim so a projectile at `projectile_speed` meets the moving target.
///
/// Falls back to the target's current position when no intercept exists.
pub fn solve_intercept_point(
    shooter_pos: DVec3,
    target_pos: DVec3,
    target_velocity: DVec3,
    projectile_speed: f64,
) -> DVec3 {
    if target_velocity == DVec3::ZERO {
        return target_pos;
    }
    match solve_intercept_time(shooter_pos, target_pos, target_velocity, projectile_speed) {
        Some(t) => target_pos + target_velocity * t,
        None => target_pos,
    }
}

/// Maximum flat-ground range for a muzzle speed (45° launch).
pub fn max_flat_range(speed: f64, gravity: f64) -> f64 {
    if gravity <= 0.0 {
        return f64::INFINITY;
    }
    speed * speed / gravity
}

/// Elevation of a launch velocity above the horizontal plane (radians).
pub fn launch_angle(velocity: DVec3) -> f64 {
    velocity.y.atan2(horizontal(velocity).length())
}

/// Apex height above the launch point for a given launch velocity.
pub fn apex_height(velocity: DVec3, gravity: f64) -> f64 {
    if gravity <= 0.0 || velocity.y <= 0.0 {
        return 0.0;
    }
    velocity.y * velocity.y / (2.0 * gravity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use skidfire_core::constants::GRAVITY;

    /// Fly a projectile with exact constant-gravity kinematics and return the
    /// height when it reaches the target's horizontal distance.
    fn height_at_distance(origin: DVec3, velocity: DVec3, distance: f64, gravity: f64) -> f64 {
        let h_speed = horizontal(velocity).length();
        let t = distance / h_speed;
        origin.y + velocity.y * t - 0.5 * gravity * t * t
    }

    #[test]
    fn test_end_to_end_low_angle_solution() {
        let origin = DVec3::ZERO;
        let target = DVec3::new(50.0, 0.0, 0.0);
        let v = solve_launch_velocity(origin, target, 30.0, GRAVITY).expect("reachable");

        let angle = launch_angle(v);
        assert!(angle > 0.0 && angle < std::f64::consts::FRAC_PI_4, "low arc");
        assert_abs_diff_eq!(v.x, 30.0 * angle.cos(), epsilon = 1e-9);
        assert!(v.x > 0.0);
        assert_abs_diff_eq!(v.y, 30.0 * angle.sin(), epsilon = 1e-9);
        assert_abs_diff_eq!(v.length(), 30.0, epsilon = 1e-9);

        let expected_apex = 30.0 * 30.0 * angle.sin().powi(2) / (2.0 * GRAVITY);
        assert_abs_diff_eq!(apex_height(v, GRAVITY), expected_apex, epsilon = 1e-9);
        assert_abs_diff_eq!(height_at_distance(origin, v, 50.0, GRAVITY), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_far_target_unreachable() {
        let v = solve_launch_velocity(DVec3::ZERO, DVec3::new(1000.0, 0.0, 0.0), 30.0, GRAVITY);
        assert!(v.is_none());
        assert!(1000.0 > max_flat_range(30.0, GRAVITY));
    }

    #[test]
    fn test_solution_speed_matches_muzzle_speed() {
        let origin = DVec3::new(3.0, 1.0, -2.0);
        for (i, target) in [
            DVec3::new(20.0, 0.0, 10.0),
            DVec3::new(-15.0, 5.0, 30.0),
            DVec3::new(0.5, -4.0, -40.0),
            DVec3::new(60.0, 10.0, 0.0),
        ]
        .into_iter()
        .enumerate()
        {
            let v = solve_launch_velocity(origin, target, 40.0, GRAVITY)
                .unwrap_or_else(|| panic!("target {i} should be reachable"));
            assert_abs_diff_eq!(v.length(), 40.0, epsilon = 1e-9);
            let angle = launch_angle(v);
            assert_abs_diff_eq!(horizontal(v).length(), 40.0 * angle.cos(), epsilon = 1e-9);

            let dist = horizontal(target - origin).length();
            assert_abs_diff_eq!(
                height_at_distance(origin, v, dist, GRAVITY),
                target.y,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn test_horizontal_heading_points_at_target() {
        let v = solve_launch_velocity(DVec3::ZERO, DVec3::new(0.0, 0.0, -25.0), 30.0, GRAVITY)
            .unwrap();
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-12);
        assert!(v.z < 0.0);
    }

    #[test]
    fn test_directly_overhead_is_vertical() {
        let v = solve_launch_velocity(DVec3::ZERO, DVec3::new(0.0, 10.0, 0.0), 30.0, GRAVITY)
            .expect("30 m/s reaches 10 m up");
        assert!(v.is_finite());
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.z, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.y, 30.0, epsilon = 1e-9);

        let below = solve_launch_velocity(DVec3::ZERO, DVec3::new(0.0, -10.0, 0.0), 30.0, GRAVITY)
            .unwrap();
        assert_abs_diff_eq!(below.y, -30.0, epsilon = 1e-9);

        // Too high to reach
        assert!(solve_launch_velocity(DVec3::ZERO, DVec3::new(0.0, 100.0, 0.0), 30.0, GRAVITY)
            .is_none());
    }

    #[test]
    fn test_degenerate_speed_and_gravity() {
        assert!(solve_launch_velocity(DVec3::ZERO, DVec3::X, 0.0, GRAVITY).is_none());
        assert!(solve_launch_velocity(DVec3::ZERO, DVec3::X, f64::NAN, GRAVITY).is_none());
        let straight = solve_launch_velocity(DVec3::ZERO, DVec3::new(3.0, 4.0, 0.0), 10.0, 0.0)
            .unwrap();
        assert_abs_diff_eq!(straight.x, 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(straight.y, 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_launch_is_reproducible() {
        let a = solve_launch_velocity(DVec3::ZERO, DVec3::new(33.3, 1.7, -12.1), 28.0, GRAVITY);
        let b = solve_launch_velocity(DVec3::ZERO, DVec3::new(33.3, 1.7, -12.1), 28.0, GRAVITY);
        assert_eq!(a.map(|v| v.to_array().map(f64::to_bits)), b.map(|v| v.to_array().map(f64::to_bits)));
    }

    #[test]
    fn test_stationary_target_intercept_is_exact() {
        let target = DVec3::new(12.345, 0.5, -7.0);
        assert_eq!(
            solve_intercept_point(DVec3::ZERO, target, DVec3::ZERO, 30.0),
            target
        );
    }

    #[test]
    fn test_intercept_leads_crossing_target() {
        let shooter = DVec3::ZERO;
        let target = DVec3::new(0.0, 0.0, 40.0);
        let velocity = DVec3::new(10.0, 0.0, 0.0);
        let speed = 30.0;

        let point = solve_intercept_point(shooter, target, velocity, speed);
        assert!(point.x > 0.0, "aim ahead of the target");

        // Projectile flight time equals target travel time.
        let t = (point.x - target.x) / velocity.x;
        assert_abs_diff_eq!(point.distance(shooter) / speed, t, epsilon = 1e-9);
    }

    #[test]
    fn test_intercept_head_on_approach() {
        // a = 800, b = -2000, c = -10000: roots 5.0 and -2.5, the larger wins.
        let target = DVec3::new(0.0, 0.0, 100.0);
        let velocity = DVec3::new(0.0, 0.0, -10.0);
        let t = solve_intercept_time(DVec3::ZERO, target, velocity, 30.0).unwrap();
        assert_abs_diff_eq!(t, 5.0, epsilon = 1e-9);
        let point = solve_intercept_point(DVec3::ZERO, target, velocity, 30.0);
        assert_abs_diff_eq!(point.z, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_intercept_point_follows_quadratic_coefficients() {
        let shooter = DVec3::new(1.0, 0.5, -2.0);
        let target = DVec3::new(20.0, 1.0, 35.0);
        let velocity = DVec3::new(-4.0, 0.0, 6.0);
        let speed = 30.0;

        let d = target - shooter;
        let a = speed * speed - velocity.length_squared();
        let b = 2.0 * d.dot(velocity);
        let c = -d.length_squared();
        let sqrt_disc = (b * b - 4.0 * a * c).sqrt();
        let expected_t = ((-b + sqrt_disc) / (2.0 * a)).max((-b - sqrt_disc) / (2.0 * a));
        assert!(expected_t > 0.0);

        let point = solve_intercept_point(shooter, target, velocity, speed);
        let expected = target + velocity * expected_t;
        assert_abs_diff_eq!(point.x, expected.x, epsilon = 1e-9);
        assert_abs_diff_eq!(point.y, expected.y, epsilon = 1e-9);
        assert_abs_diff_eq!(point.z, expected.z, epsilon = 1e-9);
    }

    #[test]
    fn test_intercept_impossible_returns_current_position() {
        // Target crossing faster than the projectile: negative discriminant.
        let target = DVec3::new(0.0, 0.0, 20.0);
        let point = solve_intercept_point(DVec3::ZERO, target, DVec3::new(50.0, 0.0, 0.0), 30.0);
        assert_eq!(point, target);
    }

    #[test]
    fn test_intercept_faster_target_takes_larger_root() {
        // a < 0 with the target receding at 40 m/s: roots 10/7 and 10.
        let target = DVec3::new(0.0, 0.0, 100.0);
        let velocity = DVec3::new(0.0, 0.0, 40.0);
        let t = solve_intercept_time(DVec3::ZERO, target, velocity, 30.0).unwrap();
        assert_abs_diff_eq!(t, 10.0, epsilon = 1e-9);

        // Approaching at 40 m/s: both roots negative, aim at the current position.
        let approaching = DVec3::new(0.0, 0.0, -40.0);
        assert!(solve_intercept_time(DVec3::ZERO, target, approaching, 30.0).is_none());
        assert_eq!(
            solve_intercept_point(DVec3::ZERO, target, approaching, 30.0),
            target
        );
    }

    #[test]
    fn test_intercept_equal_speeds_linear_case() {
        // b·t + c = 0 with b = 2(d·v) = 1800, c = -900.
        let target = DVec3::new(0.0, 0.0, 30.0);
        let velocity = DVec3::new(0.0, 0.0, 30.0);
        let t = solve_intercept_time(DVec3::ZERO, target, velocity, 30.0).unwrap();
        assert_abs_diff_eq!(t, 0.5, epsilon = 1e-9);

        assert!(solve_intercept_time(DVec3::ZERO, target, -velocity, 30.0).is_none());
    }
}
