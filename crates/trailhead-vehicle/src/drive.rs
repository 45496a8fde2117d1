//! Drive state machine.
//!
//! Pure functions that resolve the per-frame drive mode and the new
//! (speed, steering) pair from the current state, the input snapshot and the
//! handling parameters. No physics dependency.

use serde::{Deserialize, Serialize};

use trailhead_core::commands::DriveInput;
use trailhead_core::config::VehicleParams;
use trailhead_core::enums::DriveMode;

/// Continuous controller state persisted across frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Signed speed, forward positive.
    pub speed: f32,
    /// Front wheel angle (radians), positive = left.
    pub steering: f32,
}

/// Output of one resolution step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveUpdate {
    pub mode: DriveMode,
    pub state: VehicleState,
}

/// Pick the mode for this frame. Brake wins over any directional intent.
pub fn mode_for(input: &DriveInput) -> DriveMode {
    if input.brake {
        DriveMode::Brake
    } else if input.forward > 0.0 {
        DriveMode::Forward
    } else if input.forward < 0.0 {
        DriveMode::Reverse
    } else {
        DriveMode::Coast
    }
}

/// Resolve one frame of the state machine.
pub fn resolve(
    state: VehicleState,
    input: &DriveInput,
    params: &VehicleParams,
    dt: f32,
) -> DriveUpdate {
    let mode = mode_for(input);
    let steering = smooth_steering(state.steering, input.steering, params, dt);

    let speed = match mode {
        DriveMode::Brake => 0.0,
        DriveMode::Forward => {
            if state.speed < 0.0 {
                toward_zero(state.speed, params.stop_rate * dt)
            } else {
                state.speed + params.acceleration_for(input.boost) * dt
            }
        }
        DriveMode::Reverse => {
            if state.speed > 0.0 {
                toward_zero(state.speed, params.stop_rate * dt)
            } else {
                state.speed - params.acceleration_for(input.boost) * params.reverse_factor * dt
            }
        }
        DriveMode::Coast => toward_zero(state.speed, params.natural_deceleration * dt),
    };

    let speed = speed.clamp(-params.max_reverse_speed, params.forward_cap(input.boost));

    DriveUpdate {
        mode,
        state: VehicleState { speed, steering },
    }
}

/// First-order low-pass toward `intent * max_steering`.
///
/// `steering_smoothing` is the fraction of the error closed per 60 Hz frame;
/// the exponent rescales it for the actual delta.
pub fn smooth_steering(current: f32, intent: f32, params: &VehicleParams, dt: f32) -> f32 {
    let target = intent.clamp(-1.0, 1.0) * params.max_steering;
    let alpha = 1.0 - (1.0 - params.steering_smoothing).powf(dt * 60.0);
    (current + (target - current) * alpha).clamp(-params.max_steering, params.max_steering)
}

/// Move `value` toward zero by `amount` without crossing it.
pub fn toward_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else if value < 0.0 {
        (value + amount).min(0.0)
    } else {
        0.0
    }
}

/// Yaw torque magnitude for the current speed and wheel angle.
///
/// Zero inside the deadzone. Inverts when reversing.
pub fn steering_torque(state: &VehicleState, params: &VehicleParams) -> f32 {
    if state.speed.abs() <= params.steer_deadzone {
        return 0.0;
    }
    state.steering
        * state.speed.signum()
        * state.speed.abs().min(params.steer_speed_cap)
        * params.steer_torque_gain
}
