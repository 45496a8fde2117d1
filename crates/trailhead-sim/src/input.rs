//! Keyboard and touch input collection.
//!
//! Raw events are queued as they arrive and applied at the input stage, so
//! every other stage of a frame sees the same intent.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use trailhead_core::commands::{DriveInput, InputEvent, TouchPoint, Viewport};
use trailhead_core::enums::KeyCode;

/// Held-key state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
    pub brake: bool,
}

/// Virtual joystick driven by the first touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchState {
    pub active: bool,
    /// Normalized stick deflection, each axis in [-1, 1]. +y is down-screen.
    pub joystick: Vec2,
    pub boost: bool,
}

#[derive(Debug, Default)]
pub struct InputSource {
    pending: VecDeque<InputEvent>,
    keys: KeyState,
    touch: TouchState,
}

impl InputSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for the next input stage.
    pub fn push(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Apply every queued event in arrival order.
    pub fn drain(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            self.apply(&event);
        }
    }

    /// Apply one event immediately.
    pub fn apply(&mut self, event: &InputEvent) {
        trace!(?event, "input");
        match event {
            InputEvent::KeyDown { key } => self.key(*key, true),
            InputEvent::KeyUp { key } => self.key(*key, false),
            InputEvent::TouchStart { touches, viewport } => self.touch(touches, *viewport),
            // A move only steers a gesture that has already started.
            InputEvent::TouchMove { touches, viewport } if self.touch.active => {
                self.touch(touches, *viewport)
            }
            InputEvent::TouchMove { .. } => {}
            InputEvent::TouchEnd => self.touch = TouchState::default(),
        }
    }

    fn key(&mut self, key: KeyCode, down: bool) {
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => {
                self.keys.forward = down;
                if down {
                    self.keys.backward = false;
                }
            }
            KeyCode::KeyS | KeyCode::ArrowDown => {
                self.keys.backward = down;
                if down {
                    self.keys.forward = false;
                }
            }
            KeyCode::KeyA | KeyCode::ArrowLeft => self.keys.left = down,
            KeyCode::KeyD | KeyCode::ArrowRight => self.keys.right = down,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => self.keys.boost = down,
            KeyCode::Space => self.keys.brake = down,
            KeyCode::Other => {}
        }
    }

    fn touch(&mut self, touches: &[TouchPoint], viewport: Viewport) {
        let Some(first) = touches.first() else {
            return;
        };
        self.touch = TouchState {
            active: true,
            joystick: joystick(*first, viewport),
            boost: touches.len() >= 2,
        };
    }

    pub fn keys(&self) -> KeyState {
        self.keys
    }

    pub fn touch_state(&self) -> TouchState {
        self.touch
    }

    /// Normalized intent for this frame. An active touch overrides the
    /// keyboard's direction and boost; brake is keyboard only.
    pub fn snapshot(&self) -> DriveInput {
        let keys = self.keys;
        if self.touch.active {
            return DriveInput {
                forward: -self.touch.joystick.y,
                steering: -self.touch.joystick.x,
                boost: self.touch.boost,
                brake: keys.brake,
            };
        }
        DriveInput {
            forward: axis(keys.forward, keys.backward),
            steering: axis(keys.left, keys.right),
            boost: keys.boost,
            brake: keys.brake,
        }
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

/// Stick deflection of a touch relative to the viewport center; a quarter of
/// the viewport is full deflection.
pub fn joystick(touch: TouchPoint, viewport: Viewport) -> Vec2 {
    let quarter_w = viewport.width / 4.0;
    let quarter_h = viewport.height / 4.0;
    if quarter_w <= 0.0 || quarter_h <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (touch.x - viewport.width / 2.0) / quarter_w,
        (touch.y - viewport.height / 2.0) / quarter_h,
    )
    .clamp(Vec2::NEG_ONE, Vec2::ONE)
}
