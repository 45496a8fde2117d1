//! Heads-up display state: speedometer, minimap, loading overlay and the
//! zone info panel.

use glam::Vec3;
use tracing::debug;

use trailhead_core::config::ZoneContent;
use trailhead_core::constants::SPEEDOMETER_SCALE;
use trailhead_core::events::ZoneEvent;
use trailhead_core::state::{HudView, MinimapView, MinimapZone};
use trailhead_core::types::planar;

use crate::zones::ZoneRegistry;

#[derive(Debug, Clone)]
pub struct Hud {
    pub speed_display: u32,
    pub loading_visible: bool,
    pub zone_panel: Option<ZoneContent>,
    pub minimap: MinimapView,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            speed_display: 0,
            loading_visible: true,
            zone_panel: None,
            minimap: MinimapView::default(),
        }
    }
}

impl Hud {
    /// Show or hide the zone panel from this frame's transitions.
    pub fn apply_zone_events(&mut self, events: &[ZoneEvent]) {
        for event in events {
            match event {
                ZoneEvent::Entered { content, .. } => self.zone_panel = Some(content.clone()),
                ZoneEvent::Exited { .. } => self.zone_panel = None,
            }
        }
    }

    /// Refresh the speedometer and minimap.
    pub fn update(&mut self, speed: f32, position: Vec3, yaw: f32, zones: &ZoneRegistry) {
        self.speed_display = speed_display(speed);
        self.minimap = MinimapView {
            vehicle: planar(position),
            vehicle_yaw: yaw,
            zones: zones
                .zones()
                .iter()
                .map(|zone| MinimapZone {
                    id: zone.config.id.clone(),
                    center: zone.center(),
                    radius: zone.config.radius,
                    active: zone.is_active,
                })
                .collect(),
        };
    }

    pub fn hide_loading(&mut self) {
        if self.loading_visible {
            debug!("loading overlay hidden");
        }
        self.loading_visible = false;
    }

    pub fn view(&self) -> HudView {
        HudView {
            speed_display: self.speed_display,
            loading_visible: self.loading_visible,
            zone_panel: self.zone_panel.clone(),
            minimap: self.minimap.clone(),
        }
    }
}

/// Speedometer readout for an internal speed.
pub fn speed_display(speed: f32) -> u32 {
    (speed.abs() * SPEEDOMETER_SCALE).round() as u32
}
