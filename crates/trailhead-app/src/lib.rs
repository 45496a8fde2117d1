//! Trailhead headless shell.
//!
//! Runs the simulation on a dedicated game loop thread, feeds it input over
//! a channel and reports zone transitions.

pub mod game_loop;
pub mod script;
pub mod state;

pub use trailhead_core as core;
