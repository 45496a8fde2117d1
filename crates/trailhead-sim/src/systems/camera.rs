//! Third-person follow camera.

use glam::{Quat, Vec3};

use trailhead_core::constants::{CAMERA_LERP, CAMERA_OFFSET, CAMERA_START};
use trailhead_core::state::CameraView;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub look_at: Vec3,
    pub offset: Vec3,
    pub lerp: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::from_array(CAMERA_START),
            look_at: Vec3::ZERO,
            offset: Vec3::from_array(CAMERA_OFFSET),
            lerp: CAMERA_LERP,
        }
    }
}

impl CameraRig {
    /// Ease toward the spot behind the vehicle and toward looking at it.
    pub fn follow(&mut self, target: Vec3, yaw: f32) {
        let desired = target + Quat::from_rotation_y(yaw) * self.offset;
        self.position = self.position.lerp(desired, self.lerp);
        self.look_at = self.look_at.lerp(target, self.lerp);
    }

    pub fn view(&self) -> CameraView {
        CameraView {
            position: self.position,
            look_at: self.look_at,
        }
    }
}
