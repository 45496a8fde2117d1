//! Simulation orchestrator.
//!
//! `Simulation` owns every component by composition inside a `SimContext`
//! and a `Scheduler` whose stages are closures over that context, registered
//! once at their fixed priorities. Completely headless: an embedding loop
//! feeds input events and pumps frames.

use tracing::{info, warn};

use trailhead_core::commands::{DriveInput, InputEvent};
use trailhead_core::config::{default_zones, GameConfig};
use trailhead_core::constants::*;
use trailhead_core::error::SimResult;
use trailhead_core::events::ZoneEvent;
use trailhead_core::scene::Scene;
use trailhead_core::state::FrameSnapshot;
use trailhead_core::types::{FrameClock, FrameTime};
use trailhead_physics::{BodyHandle, PhysicsAdapter};
use trailhead_vehicle::VehicleController;

use crate::clock::Clock;
use crate::input::InputSource;
use crate::scheduler::{CallbackHandle, Scheduler};
use crate::systems;
use crate::systems::camera::CameraRig;
use crate::systems::hud::Hud;
use crate::world_setup;
use crate::zones::ZoneRegistry;

/// Everything a frame stage may touch. Each stage borrows only the fields it
/// needs.
pub struct SimContext {
    pub input: InputSource,
    /// Intent sampled by the input stage of the current frame.
    pub drive: DriveInput,
    pub physics: PhysicsAdapter,
    pub scene: Scene,
    pub vehicle: VehicleController,
    pub statics: Vec<BodyHandle>,
    pub zones: ZoneRegistry,
    pub camera: CameraRig,
    pub hud: Hud,
    /// Zone transitions raised during the current frame.
    pub frame_events: Vec<ZoneEvent>,
    /// Published by the render stage, strictly last.
    pub snapshot: Option<FrameSnapshot>,
}

/// The running simulation.
pub struct Simulation {
    scheduler: Scheduler<SimContext>,
    ctx: SimContext,
    config: GameConfig,
}

impl Simulation {
    /// Initialize physics, build the world, register every stage and start
    /// the scheduler.
    pub async fn initialize(mut config: GameConfig, clock: Box<dyn Clock>) -> SimResult<Self> {
        if config.zones.is_empty() {
            warn!("no zones configured, using the stock layout");
            config.zones = default_zones();
        }
        config.validate()?;

        let mut physics = PhysicsAdapter::new();
        physics.initialize(config.physics).await?;

        let mut scene = Scene::new();
        let world = world_setup::build_world(&mut physics, &mut scene, config.vehicle)?;
        let zones = ZoneRegistry::new(config.zones.clone())?;

        let ctx = SimContext {
            input: InputSource::new(),
            drive: DriveInput::default(),
            physics,
            scene,
            vehicle: world.vehicle,
            statics: world.statics,
            zones,
            camera: CameraRig::default(),
            hud: Hud::default(),
            frame_events: Vec::new(),
            snapshot: None,
        };

        let mut scheduler = Scheduler::new(clock);
        register_stages(&mut scheduler);
        scheduler.wait_frames(LOADING_OVERLAY_FRAMES, |ctx: &mut SimContext| {
            ctx.hud.hide_loading();
        });
        scheduler.start();

        info!(zones = ctx.zones.len(), "simulation initialized");
        Ok(Self {
            scheduler,
            ctx,
            config,
        })
    }

    /// Queue a raw input event for the next frame's input stage.
    pub fn queue_input(&mut self, event: InputEvent) {
        self.ctx.input.push(event);
    }

    pub fn queue_inputs(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.queue_input(event);
        }
    }

    /// Pump one frame and return its snapshot, or `None` while stopped.
    pub fn frame(&mut self) -> SimResult<Option<FrameSnapshot>> {
        match self.scheduler.pump(&mut self.ctx)? {
            Some(_) => Ok(self.ctx.snapshot.clone()),
            None => Ok(None),
        }
    }

    pub fn start(&mut self) {
        self.scheduler.start();
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Register an extra per-frame stage.
    pub fn register_stage<F>(&mut self, priority: i32, stage: F) -> CallbackHandle
    where
        F: FnMut(&mut SimContext, FrameTime) -> SimResult<()> + 'static,
    {
        self.scheduler.register(priority, stage)
    }

    pub fn unregister_stage(&mut self, handle: CallbackHandle) -> bool {
        self.scheduler.unregister(handle)
    }

    /// Run `callback` once after `n` more frames.
    pub fn wait_frames<F>(&mut self, n: u32, callback: F) -> CallbackHandle
    where
        F: FnOnce(&mut SimContext) + 'static,
    {
        self.scheduler.wait_frames(n, callback)
    }

    /// Priorities with at least one registered stage, in dispatch order.
    pub fn stage_priorities(&self) -> Vec<i32> {
        self.scheduler.priorities()
    }

    pub fn clock(&self) -> &FrameClock {
        self.scheduler.frame_clock()
    }

    /// The last published snapshot.
    pub fn latest_snapshot(&self) -> Option<&FrameSnapshot> {
        self.ctx.snapshot.as_ref()
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    pub fn vehicle(&self) -> &VehicleController {
        &self.ctx.vehicle
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.ctx.zones
    }

    pub fn physics(&self) -> &PhysicsAdapter {
        &self.ctx.physics
    }

    pub fn scene(&self) -> &Scene {
        &self.ctx.scene
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

/// Wire the fixed pipeline: input, vehicle, physics, vehicle sync, zones,
/// camera, HUD, render.
fn register_stages(scheduler: &mut Scheduler<SimContext>) {
    scheduler.register(PRIORITY_INPUT, |ctx: &mut SimContext, _time| {
        ctx.input.drain();
        ctx.drive = ctx.input.snapshot();
        ctx.frame_events.clear();
        Ok(())
    });

    scheduler.register(PRIORITY_VEHICLE_PRE_PHYSICS, |ctx: &mut SimContext, time: FrameTime| {
        ctx.vehicle.pre_physics(&ctx.drive, &mut ctx.physics, time.dt())
    });

    scheduler.register(PRIORITY_PHYSICS, |ctx: &mut SimContext, _time| {
        ctx.physics.step(&mut ctx.scene)
    });

    scheduler.register(PRIORITY_VEHICLE_POST_PHYSICS, |ctx: &mut SimContext, time: FrameTime| {
        ctx.vehicle
            .post_physics(&mut ctx.physics, &mut ctx.scene, time.dt())
    });

    scheduler.register(PRIORITY_ZONES, |ctx: &mut SimContext, _time| {
        let events = ctx.zones.update(ctx.vehicle.position());
        ctx.hud.apply_zone_events(&events);
        ctx.frame_events.extend(events);
        Ok(())
    });

    scheduler.register(PRIORITY_CAMERA, |ctx: &mut SimContext, _time| {
        ctx.camera.follow(ctx.vehicle.position(), ctx.vehicle.yaw());
        Ok(())
    });

    scheduler.register(PRIORITY_HUD, |ctx: &mut SimContext, _time| {
        let vehicle = &ctx.vehicle;
        ctx.hud
            .update(vehicle.speed(), vehicle.position(), vehicle.yaw(), &ctx.zones);
        Ok(())
    });

    scheduler.register(PRIORITY_RENDER, |ctx: &mut SimContext, time: FrameTime| {
        let events = std::mem::take(&mut ctx.frame_events);
        ctx.snapshot = Some(systems::snapshot::build_snapshot(
            time,
            &ctx.vehicle,
            &ctx.zones,
            &ctx.camera,
            &ctx.hud,
            events,
        ));
        Ok(())
    });
}
