//! Vehicle controller: the drive state machine bound to a chassis body.
//!
//! Runs twice per frame. `pre_physics` resolves the drive mode and pushes
//! forces into the physics adapter; `post_physics` copies the stepped body
//! back into the scene, animates the wheels and recovers a chassis that fell
//! through the ground.

use std::f32::consts::FRAC_PI_2;

use glam::{EulerRot, Quat, Vec3};
use tracing::{debug, warn};

use trailhead_core::commands::DriveInput;
use trailhead_core::config::VehicleParams;
use trailhead_core::constants::{
    GROUND_LEVEL, RECOVERY_HEIGHT, RECOVERY_HORIZONTAL_DAMPING, VEHICLE_COAST_STEERING_EPSILON,
    WHEEL_OFFSETS,
};
use trailhead_core::enums::DriveMode;
use trailhead_core::error::SimResult;
use trailhead_core::scene::{NodeId, Scene};
use trailhead_core::types::yaw_of;
use trailhead_physics::{BodyHandle, ChassisDimensions, PhysicsAdapter};

use crate::drive::{self, VehicleState};

#[derive(Debug, Clone, Copy)]
struct Wheel {
    node: NodeId,
    front: bool,
    spin: f32,
}

/// Player-driven vehicle.
#[derive(Debug)]
pub struct VehicleController {
    params: VehicleParams,
    state: VehicleState,
    mode: DriveMode,
    body: BodyHandle,
    chassis_node: NodeId,
    wheels: Vec<Wheel>,
    position: Vec3,
    rotation: Quat,
}

impl VehicleController {
    /// Create the chassis body at `position` with its chassis and wheel nodes.
    pub fn spawn(
        physics: &mut PhysicsAdapter,
        scene: &mut Scene,
        params: VehicleParams,
        position: Vec3,
    ) -> SimResult<Self> {
        let body = physics.create_vehicle_chassis(position, ChassisDimensions::default())?;
        let chassis_node = scene.add("vehicle", position);
        physics.link_visual(body, chassis_node)?;

        let wheels = WHEEL_OFFSETS
            .iter()
            .enumerate()
            .map(|(i, offset)| {
                let offset = Vec3::from_array(*offset);
                let node = scene.add_child(chassis_node, format!("wheel_{i}"), offset);
                let wheel = Wheel {
                    node,
                    front: offset.z < 0.0,
                    spin: 0.0,
                };
                scene.set_rotation(node, wheel_rotation(0.0, 0.0));
                wheel
            })
            .collect();

        debug!(%body, ?position, "vehicle spawned");
        Ok(Self {
            params,
            state: VehicleState::default(),
            mode: DriveMode::Coast,
            body,
            chassis_node,
            wheels,
            position,
            rotation: Quat::IDENTITY,
        })
    }

    /// Resolve this frame's drive mode and apply forces for the next step.
    pub fn pre_physics(
        &mut self,
        input: &DriveInput,
        physics: &mut PhysicsAdapter,
        dt: f32,
    ) -> SimResult<()> {
        let update = drive::resolve(self.state, input, &self.params, dt);
        if update.mode != self.mode {
            debug!(from = ?self.mode, to = ?update.mode, "drive mode changed");
        }
        self.mode = update.mode;
        self.state = update.state;

        if self.mode == DriveMode::Brake {
            let v = physics.velocity(self.body)?;
            physics.set_velocity(self.body, Vec3::new(0.0, v.y, 0.0))?;
            physics.set_angular_velocity(self.body, Vec3::ZERO)?;
            return Ok(());
        }

        let transform = physics.transform(self.body)?;
        if let Some(forward) = ground_forward(transform.rotation) {
            let force = forward * self.state.speed * self.params.drive_force_scale;
            physics.apply_force(self.body, force)?;
        }

        let torque = drive::steering_torque(&self.state, &self.params);
        if torque != 0.0 {
            physics.apply_torque(self.body, Vec3::new(0.0, torque, 0.0))?;
        }

        if self.mode == DriveMode::Coast {
            let v = physics.velocity(self.body)?;
            if self.state.speed.abs() < self.params.stop_threshold {
                self.state.speed = 0.0;
                physics.set_velocity(self.body, Vec3::new(0.0, v.y, 0.0))?;
                physics.set_angular_velocity(self.body, Vec3::ZERO)?;
            } else {
                let drag = self.params.coast_linear_drag;
                physics.set_velocity(self.body, Vec3::new(v.x * drag, v.y, v.z * drag))?;
                if input.steering.abs() < VEHICLE_COAST_STEERING_EPSILON {
                    let w = physics.angular_velocity(self.body)?;
                    let damped = w.y * self.params.coast_angular_damping;
                    physics.set_angular_velocity(self.body, Vec3::new(0.0, damped, 0.0))?;
                }
            }
        }
        Ok(())
    }

    /// Mirror the stepped chassis into the scene and animate the wheels.
    pub fn post_physics(
        &mut self,
        physics: &mut PhysicsAdapter,
        scene: &mut Scene,
        dt: f32,
    ) -> SimResult<()> {
        let mut transform = physics.transform(self.body)?;

        if transform.position.y < GROUND_LEVEL {
            let v = physics.velocity(self.body)?;
            let recovered = Vec3::new(transform.position.x, RECOVERY_HEIGHT, transform.position.z);
            warn!(
                y = transform.position.y,
                "vehicle fell below ground, recovering"
            );
            physics.set_translation(self.body, recovered)?;
            physics.set_velocity(
                self.body,
                Vec3::new(
                    v.x * RECOVERY_HORIZONTAL_DAMPING,
                    0.0,
                    v.z * RECOVERY_HORIZONTAL_DAMPING,
                ),
            )?;
            transform.position = recovered;
        }

        self.position = transform.position;
        self.rotation = transform.rotation;
        scene.set_transform(self.chassis_node, transform.position, transform.rotation);

        let spin_step = self.state.speed * dt * self.params.wheel_spin_factor;
        for wheel in &mut self.wheels {
            wheel.spin += spin_step;
            let steer = if wheel.front { self.state.steering } else { 0.0 };
            scene.set_rotation(wheel.node, wheel_rotation(wheel.spin, steer));
        }
        Ok(())
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn chassis_node(&self) -> NodeId {
        self.chassis_node
    }

    pub fn wheel_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.wheels.iter().map(|w| w.node)
    }

    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    pub fn state(&self) -> VehicleState {
        self.state
    }

    pub fn speed(&self) -> f32 {
        self.state.speed
    }

    pub fn steering(&self) -> f32 {
        self.state.steering
    }

    /// Chassis position as of the last `post_physics`.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn yaw(&self) -> f32 {
        yaw_of(self.rotation)
    }

    pub fn params(&self) -> &VehicleParams {
        &self.params
    }
}

/// Chassis forward (local -Z) projected onto the ground plane.
///
/// `None` when the chassis points straight up or down.
pub fn ground_forward(rotation: Quat) -> Option<Vec3> {
    let forward = rotation * Vec3::NEG_Z;
    let planar = Vec3::new(forward.x, 0.0, forward.z);
    if planar.length_squared() < 1e-6 {
        return None;
    }
    Some(planar.normalize())
}

/// Wheel orientation: cylinder laid on its side, rolled by `spin`, turned by
/// `steer` about the vertical.
fn wheel_rotation(spin: f32, steer: f32) -> Quat {
    Quat::from_euler(EulerRot::XYZ, spin, steer, FRAC_PI_2)
}
