//! Entity spawn factories for setting up the arena.
//!
//! Builds the player car and spawns enemy and projectile entities with
//! their component bundles.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skidfire_core::components::*;
use skidfire_core::config::ArenaConfig;
use skidfire_core::constants::*;
use skidfire_core::enums::Faction;
use skidfire_core::error::ConfigError;

use crate::enemy::EnemyBehavior;
use crate::headless::{KinematicAgent, KinematicBody};
use crate::player::PlayerCar;
use crate::targeting::{Shot, TargetingController};

/// Enemy behaviour as stored on enemy entities.
pub type ArenaEnemy = EnemyBehavior<KinematicAgent>;

/// Build the player car on a headless chassis at the configured spawn.
pub fn build_player(config: &ArenaConfig) -> Result<PlayerCar<KinematicBody>, ConfigError> {
    PlayerCar::builder()
        .body(KinematicBody::new(config.player_spawn, config.vehicle_mass))
        .vehicle_config(config.vehicle)
        .battery(config.energy)
        .weapon(config.player_weapon, config.gravity)
        .build()
}

/// Spawn one enemy per configured spawn point. Ids follow spawn order.
pub fn setup_arena(
    world: &mut World,
    config: &ArenaConfig,
    rng: &mut ChaCha8Rng,
) -> Result<(), ConfigError> {
    for (index, spawn) in config.enemy_spawns.iter().enumerate() {
        spawn_enemy(world, config, rng, index as u32, *spawn)?;
    }
    Ok(())
}

/// Spawn a single enemy with its own patrol RNG stream.
pub fn spawn_enemy(
    world: &mut World,
    config: &ArenaConfig,
    rng: &mut ChaCha8Rng,
    enemy_id: u32,
    spawn: glam::DVec3,
) -> Result<hecs::Entity, ConfigError> {
    let agent = KinematicAgent::new(spawn, config.enemy.move_speed, config.arena_radius)
        .with_obstacles(config.obstacles.clone());
    let weapon = TargetingController::new(config.enemy_weapon, config.gravity)?;
    let behavior: ArenaEnemy = EnemyBehavior::new(enemy_id, agent, config.enemy, weapon, rng.gen())?;
    Ok(world.spawn((Enemy { enemy_id }, behavior)))
}

/// Spawn a projectile entity for a fired shot.
pub fn spawn_projectile(
    world: &mut World,
    faction: Faction,
    shot: &Shot,
    projectile_size: f64,
) -> hecs::Entity {
    world.spawn((
        Position(shot.origin),
        Velocity(shot.velocity),
        Projectile {
            faction,
            age_secs: 0.0,
            lifetime_secs: PROJECTILE_LIFETIME_SECS,
            hit_radius: PROJECTILE_HIT_RADIUS * projectile_size,
        },
    ))
}
