//! Simulation for SKIDFIRE.
//!
//! Ballistic solver, arcade vehicle dynamics, battery, targeting, enemy
//! behaviour, and the headless `ArenaEngine` that owns the hecs ECS world,
//! runs systems at a fixed tick rate and produces `ArenaSnapshot`s.

pub mod ballistics;
pub mod battery;
pub mod enemy;
pub mod engine;
pub mod headless;
pub mod player;
pub mod scheduler;
pub mod systems;
pub mod targeting;
pub mod vehicle;
pub mod world_setup;

pub use engine::ArenaEngine;
pub use skidfire_core as core;
