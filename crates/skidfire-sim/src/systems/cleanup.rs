//! Cleanup system: removes projectiles that expired or hit the ground.

use hecs::{Entity, World};

use skidfire_core::components::{Position, Projectile};
use skidfire_core::constants::GROUND_Y;

/// Slack for ages accumulated one tick at a time.
const LIFETIME_EPSILON: f64 = 1e-9;

/// Queue expired and grounded projectiles, then despawn everything queued
/// this tick (including hits collected earlier).
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for (entity, (pos, projectile)) in world.query_mut::<(&Position, &Projectile)>() {
        if projectile.age_secs + LIFETIME_EPSILON >= projectile.lifetime_secs || pos.0.y < GROUND_Y {
            despawn_buffer.push(entity);
        }
    }

    despawn_buffer.sort();
    despawn_buffer.dedup();
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
