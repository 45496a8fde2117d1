//! Raw input events fed to the simulation.
//!
//! Events are queued and applied at the input stage of the next frame.

use serde::{Deserialize, Serialize};

use crate::enums::KeyCode;

/// A single touch contact in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

/// Viewport size used to normalize touch positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// All input the simulation reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputEvent {
    KeyDown { key: KeyCode },
    KeyUp { key: KeyCode },
    TouchStart {
        touches: Vec<TouchPoint>,
        viewport: Viewport,
    },
    TouchMove {
        touches: Vec<TouchPoint>,
        viewport: Viewport,
    },
    TouchEnd,
}

/// Normalized per-frame driving intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveInput {
    /// Positive = forward, negative = backward, zero = none. In [-1, 1].
    pub forward: f32,
    /// Positive = left, negative = right. In [-1, 1].
    pub steering: f32,
    pub boost: bool,
    pub brake: bool,
}
