//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Which branch of the drive state machine ran this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveMode {
    /// Full brake: speed and horizontal motion zeroed.
    Brake,
    /// Forward intent (may be stopping a reverse).
    Forward,
    /// Backward intent (may be stopping forward motion).
    Reverse,
    /// No directional intent.
    #[default]
    Coast,
}

/// Rigid body behaviour inside the physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Never moves; participates in contacts.
    Static,
    /// Integrated every step.
    Dynamic,
}

/// Physical keys the input source understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ShiftLeft,
    ShiftRight,
    Space,
    /// Any key the simulation ignores.
    Other,
}

impl KeyCode {
    /// Map a DOM-style key code string ("KeyW", "ArrowUp", "Space", ...).
    pub fn parse(code: &str) -> Self {
        match code {
            "KeyW" => KeyCode::KeyW,
            "KeyA" => KeyCode::KeyA,
            "KeyS" => KeyCode::KeyS,
            "KeyD" => KeyCode::KeyD,
            "ArrowUp" => KeyCode::ArrowUp,
            "ArrowDown" => KeyCode::ArrowDown,
            "ArrowLeft" => KeyCode::ArrowLeft,
            "ArrowRight" => KeyCode::ArrowRight,
            "ShiftLeft" => KeyCode::ShiftLeft,
            "ShiftRight" => KeyCode::ShiftRight,
            "Space" => KeyCode::Space,
            _ => KeyCode::Other,
        }
    }
}
