//! Core types and definitions for the SKIDFIRE arena.
//!
//! This crate defines the vocabulary shared across all other crates:
//! configuration records, commands, snapshot views, events, constants,
//! and the capability traits through which the simulation talks to the
//! host engine (physics body, navigation agent, line of sight, energy).
//! It contains no simulation logic.

pub mod collaborators;
pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

pub use error::ConfigError;

#[cfg(test)]
mod tests;
