//! Vehicle control for Trailhead.
//!
//! `drive` is the speed/steering state machine as pure functions over plain
//! data; `controller` binds it to a chassis body and its scene nodes.

pub mod controller;
pub mod drive;

pub use controller::VehicleController;
pub use drive::{DriveUpdate, VehicleState};
pub use trailhead_core as core;

#[cfg(test)]
mod tests;
