//! Arena engine, the core of the game loop.
//!
//! `ArenaEngine` owns the hecs ECS world, the player car and the seeded RNG,
//! processes player commands, runs all systems at the fixed tick rate, and
//! produces `ArenaSnapshot`s. Completely headless, enabling deterministic
//! testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info, warn};

use skidfire_core::collaborators::PhysicsBody;
use skidfire_core::commands::PlayerCommand;
use skidfire_core::config::ArenaConfig;
use skidfire_core::constants::DT;
use skidfire_core::enums::{Faction, GamePhase};
use skidfire_core::error::ConfigError;
use skidfire_core::events::SimEvent;
use skidfire_core::state::ArenaSnapshot;
use skidfire_core::types::{DriverInput, SimTime};

use crate::headless::{KinematicBody, ObstacleField};
use crate::player::PlayerCar;
use crate::systems;
use crate::targeting::Shot;
use crate::world_setup;

/// The arena engine. Owns the ECS world and all sim state.
pub struct ArenaEngine {
    world: World,
    config: ArenaConfig,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    player: PlayerCar<KinematicBody>,
    obstacles: ObstacleField,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    shot_buffer: Vec<Shot>,
    events: Vec<SimEvent>,
}

impl ArenaEngine {
    /// Create an engine for the given arena. Fails on invalid configuration.
    pub fn new(config: ArenaConfig) -> Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            error!(%err, "invalid arena configuration");
            return Err(err);
        }
        let player = world_setup::build_player(&config)?;
        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            player,
            obstacles: ObstacleField::new(config.obstacles.clone()),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            shot_buffer: Vec::new(),
            events: Vec::new(),
            config,
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the arena by one tick with this step's driver input and
    /// return the resulting snapshot.
    pub fn tick(&mut self, input: DriverInput) -> ArenaSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems(input);
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.player.telemetry(),
            events,
        )
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &PlayerCar<KinematicBody> {
        &self.player
    }

    /// Mutable player access (for tests and host-side teleports).
    pub fn player_mut(&mut self) -> &mut PlayerCar<KinematicBody> {
        &mut self.player
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartArena => {
                if self.phase == GamePhase::Idle {
                    match world_setup::setup_arena(&mut self.world, &self.config, &mut self.rng) {
                        Ok(()) => {
                            self.phase = GamePhase::Active;
                            self.time = SimTime::default();
                            info!(
                                seed = self.config.seed,
                                enemies = self.config.enemy_spawns.len(),
                                "arena started"
                            );
                        }
                        Err(err) => error!(%err, "arena setup failed"),
                    }
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::ApplyVehicleConfig { config } => {
                match self.player.vehicle_mut().apply_configuration(config) {
                    Ok(()) => self.events.push(SimEvent::VehicleConfigApplied),
                    Err(err) => warn!(%err, "vehicle configuration rejected"),
                }
            }
            PlayerCommand::ApplyWeaponConfig { config } => {
                match self.player.apply_weapon_config(config) {
                    Ok(()) => {
                        info!(speed = config.projectile_speed, "weapon configuration applied");
                        self.events.push(SimEvent::WeaponConfigApplied);
                    }
                    Err(err) => warn!(%err, "weapon configuration rejected"),
                }
            }
            PlayerCommand::SetGripFactor { value } => {
                self.player.vehicle_mut().set_grip_factor(value);
            }
            PlayerCommand::SetDriftFactor { value } => {
                self.player.vehicle_mut().set_drift_factor(value);
            }
            PlayerCommand::SetDriftAngleThreshold { value } => {
                self.player.vehicle_mut().set_drift_angle_threshold(value);
            }
            PlayerCommand::SetTurnGripFactor { value } => {
                self.player.vehicle_mut().set_turn_grip_factor(value);
            }
            PlayerCommand::ApplyBoost {
                force,
                duration_secs,
            } => {
                self.player
                    .vehicle_mut()
                    .apply_boost(force, duration_secs, &mut self.events);
            }
            PlayerCommand::EnterChargingZone => self.player.set_charging(true),
            PlayerCommand::ExitChargingZone => self.player.set_charging(false),
        }
    }

    /// Run all systems in order for one tick.
    fn run_systems(&mut self, input: DriverInput) {
        let now = self.time.elapsed_secs;
        let gravity = self.config.gravity;

        // 1. Player car: controller step, then chassis integration.
        self.player.fixed_step(input, DT, &mut self.events);
        self.player.vehicle_mut().body_mut().step(DT, gravity);

        // 2. Player auto-turret against the closest enemy.
        let targets = systems::enemy_ai::enemy_targets(&self.world);
        if let Some((_enemy_id, shot)) = self.player.auto_fire(now, targets, &mut self.events) {
            let size = self
                .player
                .weapon()
                .map_or(1.0, |w| w.config().projectile_size);
            self.fire(Faction::Player, shot, size);
        }

        // 3. Enemy behaviour and navigation.
        let player_target = self.player.target_state();
        systems::enemy_ai::run(
            &mut self.world,
            Some(player_target),
            now,
            &self.obstacles,
            &mut self.events,
            &mut self.shot_buffer,
        );
        let enemy_size = self.config.enemy_weapon.projectile_size;
        for shot in std::mem::take(&mut self.shot_buffer) {
            self.fire(Faction::Enemy, shot, enemy_size);
        }

        // 4. Projectiles.
        systems::projectiles::integrate(&mut self.world, gravity);
        let enemy_positions: Vec<_> = systems::enemy_ai::enemy_targets(&self.world)
            .into_iter()
            .map(|(id, target)| (id, target.position))
            .collect();
        systems::projectiles::detect_hits(
            &mut self.world,
            self.player.vehicle().body().pose().position,
            &enemy_positions,
            &mut self.events,
            &mut self.despawn_buffer,
        );

        // 5. Cleanup.
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    fn fire(&mut self, faction: Faction, shot: Shot, projectile_size: f64) {
        world_setup::spawn_projectile(&mut self.world, faction, &shot, projectile_size);
        self.events.push(SimEvent::ShotFired {
            faction,
            origin: shot.origin,
            velocity: shot.velocity,
        });
    }
}
