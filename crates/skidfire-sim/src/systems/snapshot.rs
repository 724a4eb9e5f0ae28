//! Snapshot system: builds the `ArenaSnapshot` handed to the host each tick.

use hecs::World;

use skidfire_core::components::{Enemy, Position, Projectile, Velocity};
use skidfire_core::enums::GamePhase;
use skidfire_core::events::SimEvent;
use skidfire_core::state::{ArenaSnapshot, EnemyView, ProjectileView, VehicleTelemetry};
use skidfire_core::types::SimTime;

use crate::world_setup::ArenaEnemy;

/// Build the snapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    vehicle: VehicleTelemetry,
    events: Vec<SimEvent>,
) -> ArenaSnapshot {
    ArenaSnapshot {
        time: *time,
        phase,
        vehicle,
        enemies: build_enemy_views(world),
        projectiles: build_projectile_views(world),
        events,
    }
}

fn build_enemy_views(world: &World) -> Vec<EnemyView> {
    let mut query = world.query::<(&Enemy, &ArenaEnemy)>();
    let mut views: Vec<EnemyView> = query
        .iter()
        .map(|(_entity, (enemy, behavior))| EnemyView {
            enemy_id: enemy.enemy_id,
            position: behavior.position(),
            state: behavior.state(),
        })
        .collect();
    views.sort_by_key(|v| v.enemy_id);
    views
}

fn build_projectile_views(world: &World) -> Vec<ProjectileView> {
    let mut query = world.query::<(&Position, &Velocity, &Projectile)>();
    query
        .iter()
        .map(|(_entity, (pos, vel, projectile))| ProjectileView {
            faction: projectile.faction,
            position: pos.0,
            velocity: vel.0,
        })
        .collect()
}
