//! Events emitted by the simulation for UI feedback.

use serde::{Deserialize, Serialize};

use crate::config::ZoneContent;

/// Edge-triggered zone membership transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ZoneEvent {
    /// The vehicle entered a zone; carries the zone's payload.
    Entered { id: String, content: ZoneContent },
    /// The vehicle left a zone.
    Exited { id: String },
}

impl ZoneEvent {
    pub fn zone_id(&self) -> &str {
        match self {
            ZoneEvent::Entered { id, .. } | ZoneEvent::Exited { id } => id,
        }
    }
}
