//! Priority-ordered frame scheduler.
//!
//! Callbacks are registered once under an integer priority and invoked once
//! per pumped frame in ascending priority order. Callbacks sharing a priority
//! must not depend on each other's order.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::{debug, error, info};

use trailhead_core::constants::PRIORITY_DEFERRED;
use trailhead_core::error::SimResult;
use trailhead_core::types::{FrameClock, FrameTime};

use crate::clock::Clock;

/// What a callback wants after its current invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Remove,
}

/// Identifies a registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackHandle(u64);

impl fmt::Display for CallbackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cb#{}", self.0)
    }
}

type TickFn<C> = Box<dyn FnMut(&mut C, FrameTime) -> SimResult<TickControl>>;

struct Entry<C> {
    handle: CallbackHandle,
    callback: TickFn<C>,
}

/// Frame scheduler over a shared context `C`.
pub struct Scheduler<C> {
    buckets: BTreeMap<i32, Vec<Entry<C>>>,
    index: HashMap<CallbackHandle, i32>,
    next_handle: u64,
    clock: Box<dyn Clock>,
    frame_clock: FrameClock,
    running: bool,
}

impl<C: 'static> Scheduler<C> {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            buckets: BTreeMap::new(),
            index: HashMap::new(),
            next_handle: 0,
            clock,
            frame_clock: FrameClock::default(),
            running: false,
        }
    }

    /// Register a callback that runs every frame until unregistered.
    pub fn register<F>(&mut self, priority: i32, mut callback: F) -> CallbackHandle
    where
        F: FnMut(&mut C, FrameTime) -> SimResult<()> + 'static,
    {
        self.register_control(priority, move |ctx, time| {
            callback(ctx, time)?;
            Ok(TickControl::Continue)
        })
    }

    /// Register a callback that decides after each invocation whether to stay.
    pub fn register_control<F>(&mut self, priority: i32, callback: F) -> CallbackHandle
    where
        F: FnMut(&mut C, FrameTime) -> SimResult<TickControl> + 'static,
    {
        let handle = CallbackHandle(self.next_handle);
        self.next_handle += 1;
        self.buckets.entry(priority).or_default().push(Entry {
            handle,
            callback: Box::new(callback),
        });
        self.index.insert(handle, priority);
        debug!(%handle, priority, "callback registered");
        handle
    }

    /// Remove a callback. Returns `false` if it was already gone.
    pub fn unregister(&mut self, handle: CallbackHandle) -> bool {
        let Some(priority) = self.index.remove(&handle) else {
            return false;
        };
        if let Some(bucket) = self.buckets.get_mut(&priority) {
            bucket.retain(|entry| entry.handle != handle);
            if bucket.is_empty() {
                self.buckets.remove(&priority);
            }
        }
        true
    }

    /// Fire `callback` once on the `n`-th frame from now (`0` means the next
    /// frame), after every regular stage of that frame.
    pub fn wait_frames<F>(&mut self, n: u32, callback: F) -> CallbackHandle
    where
        F: FnOnce(&mut C) + 'static,
    {
        let target = n.max(1);
        let mut count = 0;
        let mut callback = Some(callback);
        self.register_control(PRIORITY_DEFERRED, move |ctx, _time| {
            count += 1;
            if count < target {
                return Ok(TickControl::Continue);
            }
            if let Some(callback) = callback.take() {
                callback(ctx);
            }
            Ok(TickControl::Remove)
        })
    }

    /// Begin pumping frames. Does nothing while already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.frame_clock.anchor(self.clock.now());
        self.running = true;
        info!(elapsed = self.frame_clock.elapsed, "scheduler started");
    }

    /// Stop pumping frames. An in-flight frame always completes.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        info!(frames = self.frame_clock.frame, "scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one frame. Returns `None` when stopped.
    ///
    /// A failing callback aborts the rest of the frame, stops the scheduler
    /// and returns its error.
    pub fn pump(&mut self, ctx: &mut C) -> SimResult<Option<FrameTime>> {
        if !self.running {
            return Ok(None);
        }
        let time = self.frame_clock.advance(self.clock.now());

        let Self {
            buckets,
            index,
            running,
            ..
        } = self;

        let mut failure = None;
        'frame: for (priority, bucket) in buckets.iter_mut() {
            let mut i = 0;
            while i < bucket.len() {
                let entry = &mut bucket[i];
                match (entry.callback)(&mut *ctx, time) {
                    Ok(TickControl::Continue) => i += 1,
                    Ok(TickControl::Remove) => {
                        let entry = bucket.remove(i);
                        index.remove(&entry.handle);
                    }
                    Err(e) => {
                        error!(
                            priority = *priority,
                            frame = time.frame,
                            error = %e,
                            "frame callback failed"
                        );
                        *running = false;
                        failure = Some(e);
                        break 'frame;
                    }
                }
            }
        }
        buckets.retain(|_, bucket| !bucket.is_empty());

        match failure {
            Some(e) => Err(e),
            None => Ok(Some(time)),
        }
    }

    /// Frame clock state as of the last pumped frame.
    pub fn frame_clock(&self) -> &FrameClock {
        &self.frame_clock
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Registered priorities in dispatch order.
    pub fn priorities(&self) -> Vec<i32> {
        self.buckets.keys().copied().collect()
    }
}
