//! Simulation orchestration for Trailhead.
//!
//! Contains the priority scheduler, the input source, the zone registry, the
//! presentation stages and the `Simulation` that wires them together.
//! Completely headless, enabling deterministic testing with a manual clock.

pub mod clock;
pub mod engine;
pub mod input;
pub mod scheduler;
pub mod systems;
pub mod world_setup;
pub mod zones;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use engine::Simulation;
pub use scheduler::{CallbackHandle, Scheduler, TickControl};
pub use trailhead_core as core;
