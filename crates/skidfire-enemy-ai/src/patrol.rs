//! Patrol point selection around a spawn origin.

use glam::DVec3;
use rand::Rng;

use skidfire_core::collaborators::NavigationAgent;

/// Result of a patrol pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolPick {
    pub point: DVec3,
    /// True when every attempt failed and the agent is sent home.
    pub fell_back: bool,
    pub attempts: u32,
}

/// Uniform random point in the horizontal disk of `radius` around `origin`.
pub fn random_point_in_disk<R: Rng>(rng: &mut R, origin: DVec3, radius: f64) -> DVec3 {
    let r = radius * rng.gen::<f64>().sqrt();
    let theta = rng.gen::<f64>() * std::f64::consts::TAU;
    origin + DVec3::new(r * theta.sin(), 0.0, r * theta.cos())
}

/// Pick a reachable patrol point, retrying up to `max_attempts` times.
///
/// A candidate counts when the agent can project it onto the navigation
/// surface and a path to it exists. After the last failed attempt the spawn
/// origin itself is returned.
pub fn pick_patrol_point<R: Rng, N: NavigationAgent + ?Sized>(
    rng: &mut R,
    agent: &N,
    origin: DVec3,
    radius: f64,
    max_attempts: u32,
) -> PatrolPick {
    for attempt in 1..=max_attempts {
        let candidate = random_point_in_disk(rng, origin, radius);
        if let Some(point) = agent.sample_reachable(candidate, radius.max(1.0)) {
            return PatrolPick {
                point,
                fell_back: false,
                attempts: attempt,
            };
        }
    }

    PatrolPick {
        point: origin,
        fell_back: true,
        attempts: max_attempts,
    }
}
