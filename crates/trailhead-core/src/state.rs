//! Frame snapshot: the complete visible state handed to presentation each frame.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::ZoneContent;
use crate::enums::DriveMode;
use crate::events::ZoneEvent;
use crate::types::FrameTime;

/// Complete state published after the last regular stage of a frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub time: FrameTime,
    pub vehicle: VehicleView,
    /// Payload of the zone the vehicle is in, if any.
    pub active_zone: Option<ActiveZoneView>,
    pub zones: Vec<ZoneView>,
    pub camera: CameraView,
    pub hud: HudView,
    /// Zone transitions raised during this frame.
    pub zone_events: Vec<ZoneEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleView {
    pub position: Vec3,
    /// Heading in radians (0 faces -Z).
    pub yaw: f32,
    /// Signed controller speed.
    pub speed: f32,
    pub steering: f32,
    pub mode: DriveMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveZoneView {
    pub id: String,
    pub content: ZoneContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneView {
    pub id: String,
    pub label: String,
    pub center: Vec2,
    pub radius: f32,
    pub color: u32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CameraView {
    pub position: Vec3,
    pub look_at: Vec3,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HudView {
    /// Rounded speedometer readout.
    pub speed_display: u32,
    pub loading_visible: bool,
    /// Content of the zone panel, `None` when hidden.
    pub zone_panel: Option<ZoneContent>,
    pub minimap: MinimapView,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinimapView {
    pub vehicle: Vec2,
    pub vehicle_yaw: f32,
    pub zones: Vec<MinimapZone>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimapZone {
    pub id: String,
    pub center: Vec2,
    pub radius: f32,
    pub active: bool,
}
