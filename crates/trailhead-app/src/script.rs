//! Frame-stamped input scripts for headless runs.
//!
//! A script is a JSON array of `{ "frame": n, "event": { ... } }` entries.
//! Each event is queued just before frame `n` is pumped.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use trailhead_core::commands::InputEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedInput {
    pub frame: u64,
    pub event: InputEvent,
}

/// Parse a script and order it by frame, keeping file order within a frame.
pub fn parse_script(json: &str) -> Result<Vec<ScriptedInput>> {
    let mut script: Vec<ScriptedInput> =
        serde_json::from_str(json).context("malformed input script")?;
    script.sort_by_key(|entry| entry.frame);
    Ok(script)
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptedInput>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading input script {}", path.display()))?;
    parse_script(&json)
}

/// Cursor over a frame-ordered script.
#[derive(Debug, Default)]
pub struct ScriptPlayer {
    entries: Vec<ScriptedInput>,
    next: usize,
}

impl ScriptPlayer {
    pub fn new(entries: Vec<ScriptedInput>) -> Self {
        Self { entries, next: 0 }
    }

    /// Events due at or before `frame` that have not been played yet.
    pub fn due(&mut self, frame: u64) -> Vec<InputEvent> {
        let start = self.next;
        while self.next < self.entries.len() && self.entries[self.next].frame <= frame {
            self.next += 1;
        }
        self.entries[start..self.next]
            .iter()
            .map(|entry| entry.event.clone())
            .collect()
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailhead_core::enums::KeyCode;

    #[test]
    fn test_parse_orders_by_frame() {
        let json = r#"[
            { "frame": 90, "event": { "type": "KeyUp", "key": "KeyW" } },
            { "frame": 1, "event": { "type": "KeyDown", "key": "KeyW" } },
            { "frame": 90, "event": { "type": "KeyDown", "key": "Space" } }
        ]"#;
        let script = parse_script(json).unwrap();
        assert_eq!(script.len(), 3);
        assert_eq!(script[0].frame, 1);
        // Stable within a frame.
        assert_eq!(script[1].event, InputEvent::KeyUp { key: KeyCode::KeyW });
        assert_eq!(script[2].event, InputEvent::KeyDown { key: KeyCode::Space });
    }

    #[test]
    fn test_player_releases_each_event_once() {
        let mut player = ScriptPlayer::new(vec![
            ScriptedInput {
                frame: 2,
                event: InputEvent::KeyDown { key: KeyCode::KeyW },
            },
            ScriptedInput {
                frame: 5,
                event: InputEvent::TouchEnd,
            },
        ]);
        assert!(player.due(1).is_empty());
        assert_eq!(player.due(3).len(), 1);
        assert!(player.due(4).is_empty());
        assert_eq!(player.due(10), vec![InputEvent::TouchEnd]);
        assert!(player.is_finished());
    }

    #[test]
    fn test_malformed_script_is_an_error() {
        assert!(parse_script("[{ \"frame\": 1 }]").is_err());
    }
}
