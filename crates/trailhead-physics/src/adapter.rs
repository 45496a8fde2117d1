//! Physics engine adapter.
//!
//! Owns the body arena (a hecs `World`), the body-to-visual link table and
//! the fixed-step configuration. Every body operation goes through here and
//! fails with `NotInitialized` before `initialize` has completed.

use std::collections::HashMap;
use std::fmt;

use glam::{Quat, Vec3};
use hecs::{Entity, World};
use tracing::{debug, info};

use trailhead_core::config::PhysicsConfig;
use trailhead_core::constants::*;
use trailhead_core::enums::BodyKind;
use trailhead_core::error::{SimError, SimResult};
use trailhead_core::scene::{NodeId, Scene};

use crate::components::{
    cuboid_inv_inertia, Collider, ForceAccumulator, RigidBody, Transform, Velocity,
};
use crate::systems;

/// Opaque handle to a body owned by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(Entity);

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0.id())
    }
}

/// Cuboid body description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub position: Vec3,
    pub rotation: Quat,
    pub half_extents: Vec3,
    pub friction: f32,
    pub restitution: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl BodyDesc {
    pub fn cuboid(position: Vec3, half_extents: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            half_extents,
            friction: STATIC_FRICTION,
            restitution: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    /// A loose dynamic box with the default dynamic contact material.
    pub fn dynamic_cuboid(position: Vec3, half_extents: Vec3) -> Self {
        Self::cuboid(position, half_extents)
            .with_friction(DYNAMIC_FRICTION)
            .with_restitution(DYNAMIC_RESTITUTION)
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }
}

/// Full size of the vehicle chassis box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChassisDimensions {
    pub width: f32,
    pub height: f32,
    pub length: f32,
}

impl Default for ChassisDimensions {
    fn default() -> Self {
        let [width, height, length] = CHASSIS_DIMENSIONS;
        Self {
            width,
            height,
            length,
        }
    }
}

struct PhysicsWorld {
    bodies: World,
    config: PhysicsConfig,
    links: HashMap<BodyHandle, NodeId>,
    steps: u64,
}

/// The single synchronization point between physics space and visual space.
#[derive(Default)]
pub struct PhysicsAdapter {
    world: Option<PhysicsWorld>,
}

impl PhysicsAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Establish the world. Must be awaited before any body call.
    ///
    /// Calling it again on an initialized adapter keeps the existing world.
    pub async fn initialize(&mut self, config: PhysicsConfig) -> SimResult<()> {
        if self.world.is_some() {
            debug!("physics already initialized");
            return Ok(());
        }
        config
            .validate()
            .map_err(|e| SimError::InitFailed(e.to_string()))?;

        self.world = Some(PhysicsWorld {
            bodies: World::new(),
            config,
            links: HashMap::new(),
            steps: 0,
        });
        info!(
            gravity = ?config.gravity,
            timestep = config.timestep,
            "physics initialized"
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.world.is_some()
    }

    /// Number of fixed steps taken so far.
    pub fn steps(&self) -> u64 {
        self.world.as_ref().map_or(0, |w| w.steps)
    }

    /// Advance one fixed internal step, then copy dynamic body transforms
    /// into their linked scene nodes.
    pub fn step(&mut self, scene: &mut Scene) -> SimResult<()> {
        let world = self.world_mut()?;

        systems::integrate::run(&mut world.bodies, &world.config);
        systems::contacts::run(&mut world.bodies, &world.config);
        world.steps += 1;

        for (handle, node) in &world.links {
            if let Ok(mut query) = world
                .bodies
                .query_one::<(&RigidBody, &Transform)>(handle.0)
            {
                if let Some((body, transform)) = query.get() {
                    if body.kind == BodyKind::Dynamic {
                        scene.set_transform(*node, transform.position, transform.rotation);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn create_static_body(&mut self, desc: BodyDesc) -> SimResult<BodyHandle> {
        let world = self.world_mut()?;
        let entity = world.bodies.spawn((
            Transform {
                position: desc.position,
                rotation: desc.rotation,
            },
            RigidBody {
                kind: BodyKind::Static,
                inv_mass: 0.0,
                inv_inertia: Vec3::ZERO,
                linear_damping: 0.0,
                angular_damping: 0.0,
            },
            Collider {
                half_extents: desc.half_extents,
                friction: desc.friction,
                restitution: desc.restitution,
            },
        ));
        Ok(BodyHandle(entity))
    }

    pub fn create_dynamic_body(&mut self, desc: BodyDesc, mass: f32) -> SimResult<BodyHandle> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "dynamic body mass must be positive, got {mass}"
            )));
        }
        let world = self.world_mut()?;
        let entity = world.bodies.spawn((
            Transform {
                position: desc.position,
                rotation: desc.rotation,
            },
            RigidBody {
                kind: BodyKind::Dynamic,
                inv_mass: 1.0 / mass,
                inv_inertia: cuboid_inv_inertia(mass, desc.half_extents),
                linear_damping: desc.linear_damping,
                angular_damping: desc.angular_damping,
            },
            Collider {
                half_extents: desc.half_extents,
                friction: desc.friction,
                restitution: desc.restitution,
            },
            Velocity::default(),
            ForceAccumulator::default(),
        ));
        Ok(BodyHandle(entity))
    }

    /// The vehicle's chassis: a damped dynamic box with extra ballast mass.
    pub fn create_vehicle_chassis(
        &mut self,
        position: Vec3,
        dimensions: ChassisDimensions,
    ) -> SimResult<BodyHandle> {
        let half_extents = Vec3::new(dimensions.width, dimensions.height, dimensions.length) * 0.5;
        let desc = BodyDesc::cuboid(position, half_extents)
            .with_friction(CHASSIS_FRICTION)
            .with_restitution(CHASSIS_RESTITUTION)
            .with_damping(CHASSIS_LINEAR_DAMPING, CHASSIS_ANGULAR_DAMPING);
        let handle = self.create_dynamic_body(desc, CHASSIS_COLLIDER_MASS + CHASSIS_ADDITIONAL_MASS)?;
        debug!(%handle, ?position, "vehicle chassis created");
        Ok(handle)
    }

    /// Have `step` write this body's transform into `node`.
    pub fn link_visual(&mut self, body: BodyHandle, node: NodeId) -> SimResult<()> {
        let world = self.world_mut()?;
        if !world.bodies.contains(body.0) {
            return Err(SimError::InvalidHandle(body.to_string()));
        }
        world.links.insert(body, node);
        Ok(())
    }

    /// Add a force for the current step only.
    pub fn apply_force(&mut self, body: BodyHandle, force: Vec3) -> SimResult<()> {
        let (_, _, forces) = self.dynamic_mut(body)?;
        forces.force += force;
        Ok(())
    }

    /// Add a torque for the current step only.
    pub fn apply_torque(&mut self, body: BodyHandle, torque: Vec3) -> SimResult<()> {
        let (_, _, forces) = self.dynamic_mut(body)?;
        forces.torque += torque;
        Ok(())
    }

    pub fn velocity(&self, body: BodyHandle) -> SimResult<Vec3> {
        let world = self.world_ref()?;
        world
            .bodies
            .get::<&Velocity>(body.0)
            .map(|v| v.linear)
            .map_err(|_| SimError::InvalidHandle(body.to_string()))
    }

    pub fn set_velocity(&mut self, body: BodyHandle, linear: Vec3) -> SimResult<()> {
        let (_, velocity, _) = self.dynamic_mut(body)?;
        velocity.linear = linear;
        Ok(())
    }

    pub fn angular_velocity(&self, body: BodyHandle) -> SimResult<Vec3> {
        let world = self.world_ref()?;
        world
            .bodies
            .get::<&Velocity>(body.0)
            .map(|v| v.angular)
            .map_err(|_| SimError::InvalidHandle(body.to_string()))
    }

    pub fn set_angular_velocity(&mut self, body: BodyHandle, angular: Vec3) -> SimResult<()> {
        let (_, velocity, _) = self.dynamic_mut(body)?;
        velocity.angular = angular;
        Ok(())
    }

    pub fn transform(&self, body: BodyHandle) -> SimResult<Transform> {
        let world = self.world_ref()?;
        world
            .bodies
            .get::<&Transform>(body.0)
            .map(|t| *t)
            .map_err(|_| SimError::InvalidHandle(body.to_string()))
    }

    /// Teleport a dynamic body. Reserved for recovery heuristics.
    pub fn set_translation(&mut self, body: BodyHandle, position: Vec3) -> SimResult<()> {
        let (transform, _, _) = self.dynamic_mut(body)?;
        transform.position = position;
        Ok(())
    }

    pub fn body_kind(&self, body: BodyHandle) -> SimResult<BodyKind> {
        let world = self.world_ref()?;
        world
            .bodies
            .get::<&RigidBody>(body.0)
            .map(|b| b.kind)
            .map_err(|_| SimError::InvalidHandle(body.to_string()))
    }

    fn world_ref(&self) -> SimResult<&PhysicsWorld> {
        self.world.as_ref().ok_or(SimError::NotInitialized)
    }

    fn world_mut(&mut self) -> SimResult<&mut PhysicsWorld> {
        self.world.as_mut().ok_or(SimError::NotInitialized)
    }

    fn dynamic_mut(
        &mut self,
        body: BodyHandle,
    ) -> SimResult<(&mut Transform, &mut Velocity, &mut ForceAccumulator)> {
        let world = self.world_mut()?;
        world
            .bodies
            .query_one_mut::<(&mut Transform, &mut Velocity, &mut ForceAccumulator)>(body.0)
            .map_err(|_| SimError::InvalidHandle(body.to_string()))
    }
}
