// Pose interpolator: exponential-decay blend of the visible rig toward its target.
//
// Every channel moves `elapsed * rate` of the remaining way per control tick,
// with the factor clamped to [0, 1] so a long frame snaps instead of
// overshooting. Yaw blends along the shortest arc and stays wrapped.

use super::config::SmoothingConfig;
use super::rig::{RigState, TargetPose, lerp, shortest_delta, wrap_degrees};

/// Fraction of the remaining distance covered this tick.
#[inline]
pub fn blend_factor(elapsed: f32, rate: f32) -> f32 {
    (elapsed * rate).clamp(0.0, 1.0)
}

/// Blend an angle in degrees along the shortest arc. Result wrapped to [0, 360).
#[inline]
pub fn lerp_angle(current: f32, target: f32, t: f32) -> f32 {
    wrap_degrees(current + shortest_delta(current, target) * t)
}

/// Move every pose channel of `state` toward `target` for one control tick.
pub fn interpolate(state: &mut RigState, target: &TargetPose, rates: &SmoothingConfig, elapsed: f32) {
    state.ground_position = state
        .ground_position
        .lerp(target.ground_position, blend_factor(elapsed, rates.position_rate));
    state.yaw = lerp_angle(state.yaw, target.yaw, blend_factor(elapsed, rates.yaw_rate));
    state.pitch = lerp(state.pitch, target.pitch, blend_factor(elapsed, rates.pitch_rate));
    state.camera_local_offset = state
        .camera_local_offset
        .lerp(target.camera_local_offset, blend_factor(elapsed, rates.zoom_rate));
}
