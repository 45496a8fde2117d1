//! Snapshot stage: collects the frame's read-only views into a `FrameSnapshot`.

use trailhead_core::events::ZoneEvent;
use trailhead_core::state::{ActiveZoneView, FrameSnapshot, VehicleView};
use trailhead_core::types::FrameTime;
use trailhead_vehicle::VehicleController;

use crate::systems::camera::CameraRig;
use crate::systems::hud::Hud;
use crate::zones::ZoneRegistry;

/// Build the snapshot published at the end of a frame.
pub fn build_snapshot(
    time: FrameTime,
    vehicle: &VehicleController,
    zones: &ZoneRegistry,
    camera: &CameraRig,
    hud: &Hud,
    zone_events: Vec<ZoneEvent>,
) -> FrameSnapshot {
    FrameSnapshot {
        time,
        vehicle: build_vehicle(vehicle),
        active_zone: zones.active().map(|zone| ActiveZoneView {
            id: zone.config.id.clone(),
            content: zone.config.content.clone(),
        }),
        zones: zones.views(),
        camera: camera.view(),
        hud: hud.view(),
        zone_events,
    }
}

fn build_vehicle(vehicle: &VehicleController) -> VehicleView {
    VehicleView {
        position: vehicle.position(),
        yaw: vehicle.yaw(),
        speed: vehicle.speed(),
        steering: vehicle.steering(),
        mode: vehicle.mode(),
    }
}
