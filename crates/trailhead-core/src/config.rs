//! Startup configuration.
//!
//! Every struct defaults to the tuning constants, and every field is
//! `#[serde(default)]`, so a config file only needs the values it overrides.

use std::collections::HashSet;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{SimError, SimResult};

/// Top-level configuration for a simulation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub vehicle: VehicleParams,
    pub zones: Vec<ZoneConfig>,
    /// Frames per second the game loop paces itself to.
    pub frame_rate: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            vehicle: VehicleParams::default(),
            zones: Vec::new(),
            frame_rate: DISPLAY_RATE,
        }
    }
}

impl GameConfig {
    /// Defaults with the stock zone layout.
    pub fn with_default_zones() -> Self {
        Self {
            zones: default_zones(),
            ..Default::default()
        }
    }

    /// Parse a JSON config. An empty `zones` list falls back to the stock layout.
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let mut config: GameConfig = serde_json::from_str(json)?;
        if config.zones.is_empty() {
            config.zones = default_zones();
        }
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> SimResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        self.physics.validate()?;
        self.vehicle.validate()?;
        if self.frame_rate == 0 {
            return Err(SimError::InvalidConfig("frame_rate must be positive".into()));
        }

        let mut seen = HashSet::new();
        for zone in &self.zones {
            zone.validate()?;
            if !seen.insert(zone.id.as_str()) {
                return Err(SimError::InvalidConfig(format!(
                    "duplicate zone id '{}'",
                    zone.id
                )));
            }
        }
        Ok(())
    }
}

/// Physics world parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector (m/s²).
    pub gravity: Vec3,
    /// Fixed internal step (seconds).
    pub timestep: f32,
    /// Viscous tangential damping per unit of averaged contact friction (1/s).
    pub contact_friction_damping: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -GRAVITY, 0.0),
            timestep: PHYSICS_TIMESTEP,
            contact_friction_damping: CONTACT_FRICTION_DAMPING,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !self.gravity.is_finite() {
            return Err(SimError::InvalidConfig("gravity must be finite".into()));
        }
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "physics timestep must be positive, got {}",
                self.timestep
            )));
        }
        if !(self.contact_friction_damping.is_finite() && self.contact_friction_damping >= 0.0) {
            return Err(SimError::InvalidConfig(
                "contact friction damping must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Vehicle handling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleParams {
    pub max_speed: f32,
    pub max_speed_boost: f32,
    pub max_reverse_speed: f32,
    pub acceleration: f32,
    pub boost_multiplier: f32,
    pub reverse_factor: f32,
    pub stop_rate: f32,
    pub natural_deceleration: f32,
    pub max_steering: f32,
    pub steering_smoothing: f32,
    pub drive_force_scale: f32,
    pub steer_torque_gain: f32,
    pub steer_speed_cap: f32,
    pub steer_deadzone: f32,
    pub stop_threshold: f32,
    pub coast_linear_drag: f32,
    pub coast_angular_damping: f32,
    pub wheel_spin_factor: f32,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            max_speed: VEHICLE_MAX_SPEED,
            max_speed_boost: VEHICLE_MAX_SPEED_BOOST,
            max_reverse_speed: VEHICLE_MAX_REVERSE_SPEED,
            acceleration: VEHICLE_ACCELERATION,
            boost_multiplier: VEHICLE_BOOST_MULTIPLIER,
            reverse_factor: VEHICLE_REVERSE_FACTOR,
            stop_rate: VEHICLE_STOP_RATE,
            natural_deceleration: VEHICLE_NATURAL_DECELERATION,
            max_steering: VEHICLE_MAX_STEERING,
            steering_smoothing: VEHICLE_STEERING_SMOOTHING,
            drive_force_scale: VEHICLE_DRIVE_FORCE_SCALE,
            steer_torque_gain: VEHICLE_STEER_TORQUE_GAIN,
            steer_speed_cap: VEHICLE_STEER_SPEED_CAP,
            steer_deadzone: VEHICLE_STEER_DEADZONE,
            stop_threshold: VEHICLE_STOP_THRESHOLD,
            coast_linear_drag: VEHICLE_COAST_LINEAR_DRAG,
            coast_angular_damping: VEHICLE_COAST_ANGULAR_DAMPING,
            wheel_spin_factor: VEHICLE_WHEEL_SPIN_FACTOR,
        }
    }
}

impl VehicleParams {
    /// Forward speed cap for the current boost state.
    pub fn forward_cap(&self, boost: bool) -> f32 {
        if boost {
            self.max_speed_boost
        } else {
            self.max_speed
        }
    }

    /// Acceleration for the current boost state.
    pub fn acceleration_for(&self, boost: bool) -> f32 {
        if boost {
            self.acceleration * self.boost_multiplier
        } else {
            self.acceleration
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        let rates = [
            ("max_speed", self.max_speed),
            ("max_speed_boost", self.max_speed_boost),
            ("max_reverse_speed", self.max_reverse_speed),
            ("acceleration", self.acceleration),
            ("stop_rate", self.stop_rate),
            ("natural_deceleration", self.natural_deceleration),
            ("max_steering", self.max_steering),
        ];
        for (name, value) in rates {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "vehicle.{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.steering_smoothing) {
            return Err(SimError::InvalidConfig(
                "vehicle.steering_smoothing must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Payload surfaced by the UI while the vehicle is inside a zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneContent {
    pub title: String,
    pub body: String,
}

/// One circular trigger region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub id: String,
    pub x: f32,
    pub z: f32,
    #[serde(default = "default_zone_radius")]
    pub radius: f32,
    /// Floating marker text.
    pub label: String,
    pub content: ZoneContent,
    #[serde(default = "default_zone_color")]
    pub color: u32,
}

fn default_zone_radius() -> f32 {
    ZONE_DEFAULT_RADIUS
}

fn default_zone_color() -> u32 {
    ZONE_DEFAULT_COLOR
}

impl ZoneConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.id.is_empty() {
            return Err(SimError::InvalidConfig("zone id must not be empty".into()));
        }
        if !(self.x.is_finite() && self.z.is_finite()) {
            return Err(SimError::InvalidConfig(format!(
                "zone '{}' center must be finite",
                self.id
            )));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "zone '{}' radius must be positive, got {}",
                self.id, self.radius
            )));
        }
        Ok(())
    }
}

fn zone(id: &str, x: f32, z: f32, label: &str, color: u32, title: &str, body: &str) -> ZoneConfig {
    ZoneConfig {
        id: id.into(),
        x,
        z,
        radius: 10.0,
        label: label.into(),
        content: ZoneContent {
            title: title.into(),
            body: body.into(),
        },
        color,
    }
}

/// The stock four-zone layout around the spawn point.
pub fn default_zones() -> Vec<ZoneConfig> {
    vec![
        zone(
            "about",
            0.0,
            -20.0,
            "ABOUT",
            0x4f_ac_fe,
            "About Me",
            "Welcome! Drive around to explore the work and learn more about what I do.",
        ),
        zone(
            "projects",
            30.0,
            0.0,
            "PROJECTS",
            0x00_f2_fe,
            "My Projects",
            "Project 1, Project 2 and Project 3, each with a short description.",
        ),
        zone(
            "skills",
            -30.0,
            0.0,
            "SKILLS",
            0xa8_55_f7,
            "Skills & Tech",
            "Systems programming, real-time simulation, graphics and shaders.",
        ),
        zone(
            "contact",
            0.0,
            30.0,
            "CONTACT",
            0xf4_72_b6,
            "Get In Touch",
            "I'd love to hear from you: your@email.com",
        ),
    ]
}
