//! Static world construction.
//!
//! Creates the ground slab, the perimeter barriers and the fixed props as
//! static bodies with matching scene nodes, then spawns the vehicle.

use std::f32::consts::{FRAC_PI_4, PI};

use glam::{EulerRot, Quat, Vec3};
use tracing::info;

use trailhead_core::config::VehicleParams;
use trailhead_core::constants::*;
use trailhead_core::error::SimResult;
use trailhead_core::scene::Scene;
use trailhead_physics::{BodyDesc, BodyHandle, PhysicsAdapter};
use trailhead_vehicle::VehicleController;

/// Ramps as (x, z, yaw).
const RAMPS: [(f32, f32, f32); 3] = [(15.0, -10.0, 0.0), (-15.0, 10.0, PI), (20.0, 20.0, FRAC_PI_4)];
/// Full ramp size (width, height, length).
const RAMP_SIZE: [f32; 3] = [3.0, 0.5, 4.0];
/// Pitch about X; the local +Z end rises.
const RAMP_TILT: f32 = -0.2;

const TREES: [(f32, f32); 8] = [
    (10.0, -30.0),
    (-10.0, -35.0),
    (40.0, 15.0),
    (45.0, -10.0),
    (-40.0, 15.0),
    (-35.0, -15.0),
    (25.0, 40.0),
    (-20.0, 35.0),
];
/// Full trunk size; the canopy is visual only.
const TREE_TRUNK_SIZE: [f32; 3] = [0.8, 2.0, 0.8];

/// Rocks as (x, z, scale).
const ROCKS: [(f32, f32, f32); 4] = [
    (8.0, 15.0, 1.0),
    (-12.0, -8.0, 0.7),
    (35.0, -25.0, 1.2),
    (-25.0, 25.0, 0.8),
];
/// Full rock box edge per unit of scale.
const ROCK_EDGE: f32 = 1.5;

const BARRIER_HEIGHT: f32 = 2.0;
const BARRIER_THICKNESS: f32 = 1.0;

/// Everything `build_world` created.
#[derive(Debug)]
pub struct BuiltWorld {
    pub vehicle: VehicleController,
    pub statics: Vec<BodyHandle>,
}

/// Populate `physics` and `scene` with the stock layout and the vehicle.
pub fn build_world(
    physics: &mut PhysicsAdapter,
    scene: &mut Scene,
    vehicle: VehicleParams,
) -> SimResult<BuiltWorld> {
    let mut statics = Vec::new();

    let ground = static_box(
        physics,
        scene,
        "ground",
        Vec3::ZERO,
        Vec3::new(GROUND_SIZE, GROUND_HALF_THICKNESS * 2.0, GROUND_SIZE),
        Quat::IDENTITY,
        GROUND_FRICTION,
    )?;
    statics.push(ground);

    let edge = GROUND_SIZE / 2.0;
    let walls = [
        (Vec3::new(0.0, 1.0, -edge), Vec3::new(GROUND_SIZE, BARRIER_HEIGHT, BARRIER_THICKNESS)),
        (Vec3::new(0.0, 1.0, edge), Vec3::new(GROUND_SIZE, BARRIER_HEIGHT, BARRIER_THICKNESS)),
        (Vec3::new(-edge, 1.0, 0.0), Vec3::new(BARRIER_THICKNESS, BARRIER_HEIGHT, GROUND_SIZE)),
        (Vec3::new(edge, 1.0, 0.0), Vec3::new(BARRIER_THICKNESS, BARRIER_HEIGHT, GROUND_SIZE)),
    ];
    for (i, (center, size)) in walls.into_iter().enumerate() {
        statics.push(static_box(
            physics,
            scene,
            &format!("barrier_{i}"),
            center,
            size,
            Quat::IDENTITY,
            STATIC_FRICTION,
        )?);
    }

    let ramp_size = Vec3::from_array(RAMP_SIZE);
    for (i, (x, z, yaw)) in RAMPS.into_iter().enumerate() {
        let center = Vec3::new(x, ramp_size.y / 2.0, z);
        statics.push(static_box(
            physics,
            scene,
            &format!("ramp_{i}"),
            center,
            ramp_size,
            Quat::from_euler(EulerRot::XYZ, RAMP_TILT, yaw, 0.0),
            STATIC_FRICTION,
        )?);
    }

    let trunk = Vec3::from_array(TREE_TRUNK_SIZE);
    for (i, (x, z)) in TREES.into_iter().enumerate() {
        let center = Vec3::new(x, trunk.y / 2.0, z);
        statics.push(static_box(
            physics,
            scene,
            &format!("tree_{i}"),
            center,
            trunk,
            Quat::IDENTITY,
            STATIC_FRICTION,
        )?);
    }

    for (i, (x, z, scale)) in ROCKS.into_iter().enumerate() {
        let size = Vec3::splat(scale * ROCK_EDGE);
        let center = Vec3::new(x, scale * 0.5, z);
        statics.push(static_box(
            physics,
            scene,
            &format!("rock_{i}"),
            center,
            size,
            Quat::IDENTITY,
            STATIC_FRICTION,
        )?);
    }

    let vehicle = VehicleController::spawn(
        physics,
        scene,
        vehicle,
        Vec3::from_array(CHASSIS_SPAWN),
    )?;

    info!(
        statics = statics.len(),
        nodes = scene.len(),
        "world built"
    );
    Ok(BuiltWorld { vehicle, statics })
}

/// A static cuboid of full `size` centered at `center`, with a scene node.
fn static_box(
    physics: &mut PhysicsAdapter,
    scene: &mut Scene,
    name: &str,
    center: Vec3,
    size: Vec3,
    rotation: Quat,
    friction: f32,
) -> SimResult<BodyHandle> {
    let desc = BodyDesc::cuboid(center, size / 2.0)
        .with_rotation(rotation)
        .with_friction(friction);
    let body = physics.create_static_body(desc)?;
    let node = scene.add(name, center);
    scene.set_rotation(node, rotation);
    physics.link_visual(body, node)?;
    Ok(body)
}
