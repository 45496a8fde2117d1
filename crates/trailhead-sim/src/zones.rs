//! Circular trigger zones and membership tracking.

use std::collections::HashSet;

use glam::{Vec2, Vec3};
use tracing::info;

use trailhead_core::config::{ZoneConfig, ZoneContent};
use trailhead_core::error::{SimError, SimResult};
use trailhead_core::events::ZoneEvent;
use trailhead_core::state::ZoneView;
use trailhead_core::types::planar;

/// A zone and its membership flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub config: ZoneConfig,
    pub is_active: bool,
}

impl Zone {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.config.x, self.config.z)
    }

    /// Strictly inside: a point exactly on the rim is outside.
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.center()) < self.config.radius
    }

    pub fn view(&self) -> ZoneView {
        ZoneView {
            id: self.config.id.clone(),
            label: self.config.label.clone(),
            center: self.center(),
            radius: self.config.radius,
            color: self.config.color,
            is_active: self.is_active,
        }
    }
}

/// Owns every zone and the single active-zone pointer.
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
    active: Option<usize>,
}

impl ZoneRegistry {
    /// Build the registry. Rejects invalid radii and duplicate ids.
    pub fn new(configs: Vec<ZoneConfig>) -> SimResult<Self> {
        let mut seen = HashSet::new();
        for config in &configs {
            config.validate()?;
            if !seen.insert(config.id.clone()) {
                return Err(SimError::InvalidConfig(format!(
                    "duplicate zone id '{}'",
                    config.id
                )));
            }
        }
        Ok(Self {
            zones: configs
                .into_iter()
                .map(|config| Zone {
                    config,
                    is_active: false,
                })
                .collect(),
            active: None,
        })
    }

    /// Re-evaluate membership for `position` and return the transitions.
    ///
    /// Among overlapping zones the nearest center wins, then the lowest id.
    /// A change emits the exit of the old zone before the entry of the new one.
    ///
    /// `is_active` flags every zone containing the point, not just the chosen
    /// one. When the vehicle crosses from one overlapping zone into the
    /// nearer center of another, `Exited` and `Entered` are emitted while both
    /// zones stay flagged; only the active pointer switches exclusively.
    pub fn update(&mut self, position: Vec3) -> Vec<ZoneEvent> {
        let point = planar(position);

        let mut inside = Vec::new();
        for (i, zone) in self.zones.iter_mut().enumerate() {
            let distance = point.distance(zone.center());
            zone.is_active = distance < zone.config.radius;
            if zone.is_active {
                inside.push((i, distance));
            }
        }
        let zones = &self.zones;
        let chosen = inside
            .into_iter()
            .min_by(|(a, da), (b, db)| {
                da.total_cmp(db)
                    .then_with(|| zones[*a].config.id.cmp(&zones[*b].config.id))
            })
            .map(|(i, _)| i);

        if chosen == self.active {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        if let Some(previous) = self.active {
            let id = self.zones[previous].config.id.clone();
            info!(zone = %id, "zone exited");
            events.push(ZoneEvent::Exited { id });
        }
        if let Some(next) = chosen {
            let config = &self.zones[next].config;
            info!(zone = %config.id, "zone entered");
            events.push(ZoneEvent::Entered {
                id: config.id.clone(),
                content: config.content.clone(),
            });
        }
        self.active = chosen;
        events
    }

    pub fn active(&self) -> Option<&Zone> {
        self.active.map(|i| &self.zones[i])
    }

    pub fn active_content(&self) -> Option<&ZoneContent> {
        self.active().map(|zone| &zone.config.content)
    }

    pub fn get(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.config.id == id)
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn views(&self) -> Vec<ZoneView> {
        self.zones.iter().map(Zone::view).collect()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
