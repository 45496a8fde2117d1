//! Rigid-body physics for Trailhead.
//!
//! `PhysicsAdapter` owns a hecs world whose entities are rigid bodies, steps
//! it at a fixed internal timestep, and copies dynamic body transforms into
//! the visual scene. Nothing outside this crate reads or writes a body's
//! state except through the adapter.

pub mod adapter;
pub mod components;
pub mod systems;

pub use adapter::{BodyDesc, BodyHandle, ChassisDimensions, PhysicsAdapter};
pub use trailhead_core as core;
