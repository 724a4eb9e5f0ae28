//! Projectile system: ballistic integration, aging and hit checks.

use hecs::{Entity, World};

use glam::DVec3;
use skidfire_core::components::{Position, Projectile, Velocity};
use skidfire_core::constants::DT;
use skidfire_core::enums::Faction;
use skidfire_core::events::SimEvent;

/// Integrate every projectile under gravity and age it by one tick.
pub fn integrate(world: &mut World, gravity: f64) {
    for (_entity, (pos, vel, projectile)) in
        world.query_mut::<(&mut Position, &mut Velocity, &mut Projectile)>()
    {
        vel.0.y -= gravity * DT;
        pos.0 += vel.0 * DT;
        projectile.age_secs += DT;
    }
}

/// Check projectiles against the opposing faction.
///
/// Player projectiles test against `enemies` (id, position); enemy projectiles
/// test against `player`. Each projectile hits at most once and is queued for
/// despawn.
pub fn detect_hits(
    world: &mut World,
    player: DVec3,
    enemies: &[(u32, DVec3)],
    events: &mut Vec<SimEvent>,
    despawn_buffer: &mut Vec<Entity>,
) {
    for (entity, (pos, projectile)) in world.query_mut::<(&Position, &Projectile)>() {
        let hit = match projectile.faction {
            Faction::Player => enemies
                .iter()
                .find(|(_, enemy)| enemy.distance(pos.0) <= projectile.hit_radius)
                .map(|(id, _)| Some(*id)),
            Faction::Enemy => (player.distance(pos.0) <= projectile.hit_radius).then_some(None),
        };
        if let Some(enemy_id) = hit {
            events.push(SimEvent::ProjectileHit {
                faction: projectile.faction,
                enemy_id,
                position: pos.0,
            });
            despawn_buffer.push(entity);
        }
    }
}
