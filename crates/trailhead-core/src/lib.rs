//! Core types and definitions for the Trailhead simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! frame timing, input commands, zone events, configuration, the visual
//! scene arena, frame snapshots, errors and tuning constants.
//! It has no dependency on the physics backend or the game loop shell.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod scene;
pub mod state;
pub mod types;

pub use error::{SimError, SimResult};

#[cfg(test)]
mod tests;
