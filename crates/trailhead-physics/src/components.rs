//! Body components stored in the physics hecs world.
//!
//! Plain data only. Static bodies carry `Transform`, `RigidBody` and
//! `Collider`; dynamic bodies additionally carry `Velocity` and
//! `ForceAccumulator`.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use trailhead_core::enums::BodyKind;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec3,
    /// World-space angular velocity (rad/s).
    pub angular: Vec3,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RigidBody {
    pub kind: BodyKind,
    /// Zero for static bodies.
    pub inv_mass: f32,
    /// Inverse principal moments of inertia in body space.
    pub inv_inertia: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

/// Cuboid collider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    pub half_extents: Vec3,
    pub friction: f32,
    pub restitution: f32,
}

/// Force and torque accumulated for the current step only.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ForceAccumulator {
    pub force: Vec3,
    pub torque: Vec3,
}

impl ForceAccumulator {
    pub fn clear(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }
}

/// Axis-aligned bounding box, in world space or a static's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Bounds of a cuboid with `half_extents` placed at `transform`.
    pub fn of_cuboid(transform: &Transform, half_extents: Vec3) -> Self {
        let basis = Mat3::from_quat(transform.rotation);
        let extent = basis.x_axis.abs() * half_extents.x
            + basis.y_axis.abs() * half_extents.y
            + basis.z_axis.abs() * half_extents.z;
        Self {
            min: transform.position - extent,
            max: transform.position + extent,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Inverse principal inertia of a solid cuboid.
pub fn cuboid_inv_inertia(mass: f32, half_extents: Vec3) -> Vec3 {
    let h2 = half_extents * half_extents;
    let moments = Vec3::new(h2.y + h2.z, h2.x + h2.z, h2.x + h2.y) * (mass / 3.0);
    Vec3::new(
        safe_recip(moments.x),
        safe_recip(moments.y),
        safe_recip(moments.z),
    )
}

fn safe_recip(value: f32) -> f32 {
    if value > f32::EPSILON {
        1.0 / value
    } else {
        0.0
    }
}
