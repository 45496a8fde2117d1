//! Simulation constants and tuning parameters.

// --- Frame timing ---

/// Largest frame delta handed to callbacks (seconds). Longer stalls are absorbed.
pub const MAX_FRAME_DELTA: f64 = 0.1;

/// Smallest frame delta handed to callbacks (seconds), used when the clock did not advance.
pub const MIN_FRAME_DELTA: f64 = 1e-6;

/// Nominal display rate the game loop shell paces itself at (Hz).
pub const DISPLAY_RATE: u32 = 60;

// --- Stage priorities (lower runs first) ---

pub const PRIORITY_INPUT: i32 = 0;
pub const PRIORITY_VEHICLE_PRE_PHYSICS: i32 = 1;
pub const PRIORITY_PHYSICS: i32 = 10;
pub const PRIORITY_VEHICLE_POST_PHYSICS: i32 = 20;
pub const PRIORITY_ZONES: i32 = 25;
pub const PRIORITY_CAMERA: i32 = 30;
pub const PRIORITY_HUD: i32 = 50;
/// Snapshot publishing. Always the last regular stage.
pub const PRIORITY_RENDER: i32 = 100;
/// Deferred `wait_frames` callbacks run after everything else.
pub const PRIORITY_DEFERRED: i32 = 999;

// --- Physics ---

/// Downward gravity (m/s²) along -Y.
pub const GRAVITY: f32 = 9.81;

/// Internal fixed physics timestep (seconds), independent of frame delta.
pub const PHYSICS_TIMESTEP: f32 = 1.0 / 60.0;

/// Scales the averaged contact friction into a viscous tangential damping rate (1/s).
pub const CONTACT_FRICTION_DAMPING: f32 = 0.5;

/// Ground slab edge length (meters). The slab is 0.2 m thick and centered at y = 0.
pub const GROUND_SIZE: f32 = 200.0;
pub const GROUND_HALF_THICKNESS: f32 = 0.1;
pub const GROUND_FRICTION: f32 = 0.8;

pub const STATIC_FRICTION: f32 = 0.8;
pub const DYNAMIC_FRICTION: f32 = 0.5;
pub const DYNAMIC_RESTITUTION: f32 = 0.2;

// --- Chassis ---

pub const CHASSIS_SPAWN: [f32; 3] = [0.0, 2.0, 0.0];
/// Width, height, length of the chassis box (meters).
pub const CHASSIS_DIMENSIONS: [f32; 3] = [1.3, 0.4, 2.0];
pub const CHASSIS_COLLIDER_MASS: f32 = 2.5;
pub const CHASSIS_ADDITIONAL_MASS: f32 = 0.5;
pub const CHASSIS_LINEAR_DAMPING: f32 = 0.5;
pub const CHASSIS_ANGULAR_DAMPING: f32 = 0.5;
pub const CHASSIS_FRICTION: f32 = 0.5;
pub const CHASSIS_RESTITUTION: f32 = 0.1;

/// Wheel mount points relative to the chassis: front-left, front-right, back-left, back-right.
/// Front is -Z.
pub const WHEEL_OFFSETS: [[f32; 3]; 4] = [
    [-0.6, -0.2, -0.7],
    [0.6, -0.2, -0.7],
    [-0.6, -0.2, 0.7],
    [0.6, -0.2, 0.7],
];

// --- Vehicle control ---

pub const VEHICLE_MAX_SPEED: f32 = 1.0;
pub const VEHICLE_MAX_SPEED_BOOST: f32 = 2.0;
pub const VEHICLE_MAX_REVERSE_SPEED: f32 = 0.5;
pub const VEHICLE_ACCELERATION: f32 = 0.8;
pub const VEHICLE_BOOST_MULTIPLIER: f32 = 1.5;
/// Reverse acceleration as a fraction of forward acceleration.
pub const VEHICLE_REVERSE_FACTOR: f32 = 0.7;
/// Rate at which an opposing directional intent brings speed to zero (1/s).
pub const VEHICLE_STOP_RATE: f32 = 10.0;
/// Rate at which speed decays with no directional intent (1/s).
pub const VEHICLE_NATURAL_DECELERATION: f32 = 8.0;
/// Max front wheel angle (radians).
pub const VEHICLE_MAX_STEERING: f32 = 0.5;
/// Fraction of the remaining steering error closed per 60 Hz frame.
pub const VEHICLE_STEERING_SMOOTHING: f32 = 0.2;
pub const VEHICLE_DRIVE_FORCE_SCALE: f32 = 3.0;
pub const VEHICLE_STEER_TORQUE_GAIN: f32 = 4.0;
pub const VEHICLE_STEER_SPEED_CAP: f32 = 3.0;
/// Below this |speed| no steering torque is applied.
pub const VEHICLE_STEER_DEADZONE: f32 = 0.1;
/// Below this |speed| with no directional intent the vehicle is hard-stopped.
pub const VEHICLE_STOP_THRESHOLD: f32 = 0.02;
/// Per-frame horizontal velocity multiplier while coasting.
pub const VEHICLE_COAST_LINEAR_DRAG: f32 = 0.5;
/// Per-frame yaw rate multiplier while coasting without steering.
pub const VEHICLE_COAST_ANGULAR_DAMPING: f32 = 0.85;
/// Steering intent magnitude under which coasting also damps yaw.
pub const VEHICLE_COAST_STEERING_EPSILON: f32 = 0.1;
pub const VEHICLE_WHEEL_SPIN_FACTOR: f32 = 5.0;

// --- Recovery ---

pub const GROUND_LEVEL: f32 = 0.0;
pub const RECOVERY_HEIGHT: f32 = 2.0;
pub const RECOVERY_HORIZONTAL_DAMPING: f32 = 0.5;

// --- Zones ---

pub const ZONE_DEFAULT_RADIUS: f32 = 8.0;
pub const ZONE_DEFAULT_COLOR: u32 = 0x4f_ac_fe;

// --- Presentation ---

pub const CAMERA_OFFSET: [f32; 3] = [0.0, 8.0, 12.0];
pub const CAMERA_START: [f32; 3] = [0.0, 10.0, 15.0];
pub const CAMERA_LERP: f32 = 0.05;
/// Multiplier from internal speed units to the speedometer readout.
pub const SPEEDOMETER_SCALE: f32 = 60.0;
/// Frames the loading overlay stays up after the loop starts.
pub const LOADING_OVERLAY_FRAMES: u32 = 30;
