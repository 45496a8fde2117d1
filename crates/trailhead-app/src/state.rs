//! State shared between the game loop thread and its owner.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use trailhead_core::commands::InputEvent;
use trailhead_core::state::FrameSnapshot;

/// Commands sent to the game loop thread.
#[derive(Debug, Clone, PartialEq)]
pub enum GameLoopCommand {
    /// A raw input event for the simulation's next frame.
    Input(InputEvent),
    /// Resume pumping frames.
    Start,
    /// Pause frame pumping; the thread keeps draining commands.
    Stop,
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handle the owner keeps while the loop runs.
pub struct AppState {
    /// `None` before the loop is spawned.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest published snapshot, updated by the game loop after each frame.
    pub latest_snapshot: Arc<Mutex<Option<FrameSnapshot>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }

    /// Forward a command to the running loop. Returns `false` when there is
    /// no loop or it has already exited.
    pub fn send(&self, command: GameLoopCommand) -> bool {
        let Ok(lock) = self.command_tx.lock() else {
            return false;
        };
        match lock.as_ref() {
            Some(tx) => tx.send(command).is_ok(),
            None => false,
        }
    }

    pub fn snapshot(&self) -> Option<FrameSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|lock| lock.clone())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
