//! Semi-implicit Euler integration of dynamic bodies.
//!
//! velocity += (gravity + force / m) * dt, damping, then position += velocity * dt.
//! Accumulated forces and torques are consumed by the step.

use glam::{Quat, Vec3};
use hecs::World;

use trailhead_core::config::PhysicsConfig;

use crate::components::{ForceAccumulator, RigidBody, Transform, Velocity};

pub fn run(world: &mut World, config: &PhysicsConfig) {
    let dt = config.timestep;

    for (_entity, (body, transform, velocity, forces)) in world.query_mut::<(
        &RigidBody,
        &mut Transform,
        &mut Velocity,
        &mut ForceAccumulator,
    )>() {
        velocity.linear += (config.gravity + forces.force * body.inv_mass) * dt;
        velocity.angular += angular_acceleration(body, transform.rotation, forces.torque) * dt;

        velocity.linear *= 1.0 / (1.0 + dt * body.linear_damping);
        velocity.angular *= 1.0 / (1.0 + dt * body.angular_damping);

        transform.position += velocity.linear * dt;

        let spin = velocity.angular * dt;
        if spin.length_squared() > 0.0 {
            transform.rotation = (Quat::from_scaled_axis(spin) * transform.rotation).normalize();
        }

        forces.clear();
    }
}

/// World-space angular acceleration for a world-space torque.
fn angular_acceleration(body: &RigidBody, rotation: Quat, torque: Vec3) -> Vec3 {
    let local = rotation.inverse() * torque;
    rotation * (local * body.inv_inertia)
}
