//! Presentation stages run after the zone update each frame.
//!
//! They only read core state (vehicle, zones) and keep their own small view
//! state; nothing here feeds back into physics.

pub mod camera;
pub mod hud;
pub mod snapshot;
