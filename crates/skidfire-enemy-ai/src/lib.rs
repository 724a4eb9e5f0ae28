//! Enemy AI for SKIDFIRE.
//!
//! Implements the Patrol/Follow/Attack state machine, patrol point
//! selection around a spawn origin, and stuck detection for navigation
//! agents.

pub mod fsm;
pub mod patrol;
pub mod stuck;

pub use skidfire_core as core;
