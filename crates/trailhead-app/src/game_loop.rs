//! Game loop thread. Owns the simulation and pumps one frame per display
//! refresh.
//!
//! The simulation is built inside this thread because it is not `Send`.
//! Commands arrive via an `mpsc` channel; the latest snapshot is stored in
//! shared state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use futures::executor::block_on;
use tracing::{error, info, warn};

use trailhead_core::config::GameConfig;
use trailhead_core::events::ZoneEvent;
use trailhead_core::state::FrameSnapshot;
use trailhead_core::SimError;
use trailhead_sim::{Clock, ManualClock, MonotonicClock, Simulation};

use crate::script::{ScriptPlayer, ScriptedInput};
use crate::state::GameLoopCommand;

/// Nominal duration of one frame at `rate` frames per second.
pub fn frame_duration(rate: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(rate.max(1)))
}

/// How the loop runs.
#[derive(Debug, Clone, Default)]
pub struct LoopOptions {
    /// Stop after this many pumped frames.
    pub max_frames: Option<u64>,
    /// Sleep to hold the configured frame rate against the wall clock.
    /// Otherwise frames run back to back on a simulated clock.
    pub realtime: bool,
    pub script: Vec<ScriptedInput>,
}

/// What the loop did before exiting.
#[derive(Debug, Clone, Default)]
pub struct LoopSummary {
    pub frames: u64,
    pub zone_events: Vec<ZoneEvent>,
    pub last_snapshot: Option<FrameSnapshot>,
}

/// Spawn the game loop in a new thread.
///
/// Returns the command sender and the thread handle; joining yields the
/// summary or the error that ended the loop.
pub fn spawn_game_loop(
    config: GameConfig,
    options: LoopOptions,
    latest_snapshot: Arc<Mutex<Option<FrameSnapshot>>>,
) -> std::io::Result<(
    mpsc::Sender<GameLoopCommand>,
    JoinHandle<Result<LoopSummary, SimError>>,
)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("trailhead-game-loop".into())
        .spawn(move || run_game_loop(config, options, cmd_rx, &latest_snapshot))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown, channel disconnect, the frame limit or
/// a failing frame.
pub fn run_game_loop(
    config: GameConfig,
    options: LoopOptions,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<FrameSnapshot>>,
) -> Result<LoopSummary, SimError> {
    let frame = frame_duration(config.frame_rate);
    let simulated = ManualClock::new();
    let clock: Box<dyn Clock> = if options.realtime {
        Box::new(MonotonicClock::new())
    } else {
        Box::new(simulated.clone())
    };

    let mut sim = block_on(Simulation::initialize(config, clock))?;
    let mut script = ScriptPlayer::new(options.script);
    let mut summary = LoopSummary::default();
    let mut next_frame_time = Instant::now();

    info!(
        realtime = options.realtime,
        max_frames = ?options.max_frames,
        "game loop started"
    );

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Input(event)) => sim.queue_input(event),
                Ok(GameLoopCommand::Start) => sim.start(),
                Ok(GameLoopCommand::Stop) => sim.stop(),
                Ok(GameLoopCommand::Shutdown) => {
                    info!(frames = summary.frames, "game loop shut down");
                    return Ok(summary);
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    info!(frames = summary.frames, "command channel closed");
                    return Ok(summary);
                }
            }
        }

        // 2. Scripted input due for the coming frame
        sim.queue_inputs(script.due(summary.frames + 1));

        // 3. Pump one frame
        if !options.realtime {
            simulated.advance(frame);
        }
        match sim.frame() {
            Ok(Some(snapshot)) => {
                summary.frames += 1;
                report_zone_events(&snapshot.zone_events);
                summary.zone_events.extend(snapshot.zone_events.iter().cloned());
                if let Ok(mut lock) = latest_snapshot.lock() {
                    *lock = Some(snapshot.clone());
                }
                summary.last_snapshot = Some(snapshot);
            }
            Ok(None) => {}
            Err(e) => {
                error!(frames = summary.frames, error = %e, "simulation frame failed");
                return Err(e);
            }
        }

        if options.max_frames.is_some_and(|max| summary.frames >= max) {
            info!(frames = summary.frames, "frame limit reached");
            return Ok(summary);
        }

        // 4. Sleep until the next frame
        if options.realtime {
            next_frame_time += frame;
            let now = Instant::now();
            if next_frame_time > now {
                std::thread::sleep(next_frame_time - now);
            } else if now - next_frame_time > frame * 2 {
                // Too far behind; reset to avoid a catch-up spiral
                warn!("game loop fell behind, resetting pacing");
                next_frame_time = now;
            }
        } else if !sim.is_running() {
            // Stopped with no wall clock to wait on; block for the next command.
            match cmd_rx.recv() {
                Ok(GameLoopCommand::Input(event)) => sim.queue_input(event),
                Ok(GameLoopCommand::Start) => sim.start(),
                Ok(GameLoopCommand::Stop) => {}
                Ok(GameLoopCommand::Shutdown) | Err(_) => {
                    info!(frames = summary.frames, "game loop shut down");
                    return Ok(summary);
                }
            }
        }
    }
}

fn report_zone_events(events: &[ZoneEvent]) {
    for event in events {
        match event {
            ZoneEvent::Entered { id, content } => {
                info!(zone = %id, title = %content.title, "entered zone");
            }
            ZoneEvent::Exited { id } => info!(zone = %id, "left zone"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailhead_core::commands::InputEvent;
    use trailhead_core::enums::{DriveMode, KeyCode};

    fn headless(max_frames: u64, script: Vec<ScriptedInput>) -> LoopOptions {
        LoopOptions {
            max_frames: Some(max_frames),
            realtime: false,
            script,
        }
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::Input(InputEvent::KeyDown { key: KeyCode::KeyW }))
            .unwrap();
        tx.send(GameLoopCommand::Stop).unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }

        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::Input(InputEvent::KeyDown { key: KeyCode::KeyW })
        ));
        assert!(matches!(commands[1], GameLoopCommand::Stop));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_frame_duration_constant() {
        // 60Hz = 16.666ms per frame
        assert_eq!(frame_duration(60).as_nanos(), 1_000_000_000u128 / 60);
        assert_eq!(frame_duration(0), Duration::from_secs(1));
    }

    #[test]
    fn test_headless_run_stops_at_frame_limit() {
        let latest = Mutex::new(None);
        let (_tx, rx) = mpsc::channel();
        let summary = run_game_loop(
            GameConfig::with_default_zones(),
            headless(45, Vec::new()),
            rx,
            &latest,
        )
        .unwrap();
        assert_eq!(summary.frames, 45);
        let snapshot = latest.lock().unwrap().clone().unwrap();
        assert_eq!(snapshot.time.frame, 45);
        // Simulated clock: every frame is exactly one display interval.
        assert!((snapshot.time.elapsed - 45.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_scripted_drive_reaches_about_zone() {
        let script = vec![
            ScriptedInput {
                frame: 60,
                event: InputEvent::KeyDown { key: KeyCode::KeyW },
            },
            ScriptedInput {
                frame: 1500,
                event: InputEvent::KeyUp { key: KeyCode::KeyW },
            },
            ScriptedInput {
                frame: 1500,
                event: InputEvent::KeyDown { key: KeyCode::Space },
            },
        ];
        let latest = Mutex::new(None);
        let (_tx, rx) = mpsc::channel();
        let summary = run_game_loop(
            GameConfig::with_default_zones(),
            headless(1560, script),
            rx,
            &latest,
        )
        .unwrap();

        let first = summary.zone_events.first().unwrap();
        assert!(matches!(first, ZoneEvent::Entered { .. }));
        assert_eq!(first.zone_id(), "about");
        let last = summary.last_snapshot.unwrap();
        assert_eq!(last.vehicle.mode, DriveMode::Brake);
        assert_eq!(last.vehicle.speed, 0.0);
    }

    #[test]
    fn test_shutdown_command_ends_loop() {
        let latest = Arc::new(Mutex::new(None));
        let options = LoopOptions {
            max_frames: None,
            realtime: false,
            script: Vec::new(),
        };
        let (tx, handle) =
            spawn_game_loop(GameConfig::with_default_zones(), options, Arc::clone(&latest)).unwrap();
        tx.send(GameLoopCommand::Stop).unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();
        let summary = handle.join().unwrap().unwrap();
        assert!(summary.zone_events.is_empty());
    }
}
