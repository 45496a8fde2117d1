//! Contact resolution of dynamic bodies against static colliders.
//!
//! Static cuboids may be oriented. Each dynamic cuboid is bounded in the
//! static's local frame and pushed out along the static's axis of least
//! penetration. The approaching normal velocity is removed (bounced when fast
//! enough) and the tangential velocity gets viscous friction.

use glam::{Quat, Vec3};
use hecs::World;

use trailhead_core::config::PhysicsConfig;
use trailhead_core::enums::BodyKind;

use crate::components::{Aabb, Collider, RigidBody, Transform, Velocity};

/// Normal approach speed (m/s) below which contacts do not bounce.
const RESTITUTION_THRESHOLD: f32 = 1.0;

struct StaticContact {
    transform: Transform,
    half_extents: Vec3,
    friction: f32,
    restitution: f32,
}

pub fn run(world: &mut World, config: &PhysicsConfig) {
    let statics: Vec<StaticContact> = world
        .query::<(&RigidBody, &Transform, &Collider)>()
        .iter()
        .filter(|(_, (body, _, _))| body.kind == BodyKind::Static)
        .map(|(_, (_, transform, collider))| StaticContact {
            transform: *transform,
            half_extents: collider.half_extents,
            friction: collider.friction,
            restitution: collider.restitution,
        })
        .collect();

    if statics.is_empty() {
        return;
    }

    let dt = config.timestep;
    for (_entity, (_body, transform, velocity, collider)) in
        world.query_mut::<(&RigidBody, &mut Transform, &mut Velocity, &Collider)>()
    {
        for contact in &statics {
            let Some((normal, depth)) = oriented_penetration(
                transform,
                collider.half_extents,
                &contact.transform,
                contact.half_extents,
            ) else {
                continue;
            };

            transform.position += normal * depth;

            let approach = velocity.linear.dot(normal);
            if approach >= 0.0 {
                continue;
            }

            let restitution = (collider.restitution + contact.restitution) * 0.5;
            let bounce = if -approach > RESTITUTION_THRESHOLD {
                -approach * restitution
            } else {
                0.0
            };
            velocity.linear += normal * (bounce - approach);

            let friction = (collider.friction + contact.friction) * 0.5;
            let normal_part = normal * velocity.linear.dot(normal);
            let tangential = velocity.linear - normal_part;
            let keep = 1.0 / (1.0 + dt * friction * config.contact_friction_damping);
            velocity.linear = normal_part + tangential * keep;
        }
    }
}

/// Separation of a cuboid from a possibly rotated fixed cuboid, as a world
/// normal (pointing away from `fixed`) and depth.
///
/// The moving cuboid is bounded in `fixed`'s frame, so the normal is always
/// one of `fixed`'s face normals.
pub fn oriented_penetration(
    moving: &Transform,
    moving_half: Vec3,
    fixed: &Transform,
    fixed_half: Vec3,
) -> Option<(Vec3, f32)> {
    let to_local = fixed.rotation.inverse();
    let local = Transform {
        position: to_local * (moving.position - fixed.position),
        rotation: to_local * moving.rotation,
    };
    let bounds = Aabb::of_cuboid(&local, moving_half);
    let fixed_bounds = Aabb {
        min: -fixed_half,
        max: fixed_half,
    };
    let (normal, depth) = penetration(&bounds, &fixed_bounds)?;
    Some((rotate(fixed.rotation, normal), depth))
}

fn rotate(rotation: Quat, normal: Vec3) -> Vec3 {
    if rotation == Quat::IDENTITY {
        normal
    } else {
        (rotation * normal).normalize()
    }
}

/// Separation normal (pointing from `fixed` toward `moving`) and depth, if overlapping.
pub fn penetration(moving: &Aabb, fixed: &Aabb) -> Option<(Vec3, f32)> {
    let overlap = moving.max.min(fixed.max) - moving.min.max(fixed.min);
    if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
        return None;
    }

    let offset = moving.center() - fixed.center();
    let (axis, depth, along) = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        (Vec3::X, overlap.x, offset.x)
    } else if overlap.y <= overlap.z {
        (Vec3::Y, overlap.y, offset.y)
    } else {
        (Vec3::Z, overlap.z, offset.z)
    };

    let normal = if along >= 0.0 { axis } else { -axis };
    Some((normal, depth))
}
