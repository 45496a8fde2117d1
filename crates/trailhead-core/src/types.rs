//! Fundamental timing and geometric helpers.

use std::time::Duration;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_FRAME_DELTA, MIN_FRAME_DELTA};

/// Timing information handed to every scheduler callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameTime {
    /// Seconds since the previous frame, clamped to `(0, MAX_FRAME_DELTA]`.
    pub delta: f64,
    /// Accumulated simulated seconds (sum of clamped deltas).
    pub elapsed: f64,
    /// Frame number, starting at 1 for the first pumped frame.
    pub frame: u64,
}

impl FrameTime {
    /// Delta as `f32` for the physics/vehicle math.
    pub fn dt(&self) -> f32 {
        self.delta as f32
    }
}

/// Frame clock mutated once per frame by the scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    pub last_timestamp: Duration,
    pub elapsed: f64,
    pub last_delta: f64,
    pub frame: u64,
}

impl FrameClock {
    /// Re-anchor the clock without advancing simulated time.
    pub fn anchor(&mut self, now: Duration) {
        self.last_timestamp = now;
    }

    /// Advance to `now`. A stall is absorbed by the delta cap and a clock that
    /// did not move still yields the minimum delta.
    pub fn advance(&mut self, now: Duration) -> FrameTime {
        let raw = now.saturating_sub(self.last_timestamp).as_secs_f64();
        let delta = raw.clamp(MIN_FRAME_DELTA, MAX_FRAME_DELTA);

        self.last_timestamp = self.last_timestamp.max(now);
        self.last_delta = delta;
        self.elapsed += delta;
        self.frame += 1;

        FrameTime {
            delta,
            elapsed: self.elapsed,
            frame: self.frame,
        }
    }
}

/// Project a world position onto the ground plane (x, z).
pub fn planar(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}

/// Distance between two points ignoring height.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar(a).distance(planar(b))
}

/// Heading around +Y in radians. Zero faces -Z, positive turns toward -X.
pub fn yaw_of(rotation: Quat) -> f32 {
    let forward = rotation * Vec3::NEG_Z;
    (-forward.x).atan2(-forward.z)
}
