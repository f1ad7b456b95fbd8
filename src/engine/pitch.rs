// Occlusion-aware pitch controller and ground-height sampling.
// Both run on the fixed-rate physics tick only.
//
// Each tick casts six rays from just in front of and above the anchor back
// toward the camera: two pitch bands ("lowered" and "direct") times three
// headings (straight, and fanned left/right). The two band results drive a
// small hysteresis table that nudges `pitch_offset` one step at a time:
//
//   lowered  direct   action
//   -------  ------   ------------------------------------------
//   hit      clear    hold: the current pitch just clears
//   clear    clear    relax one step toward the base pitch
//   clear    hit      dead zone: no change, target pitch untouched
//   hit      hit      raise one step
//
// The offset is clamped to [0, max_offset] after every change.

use glam::Vec3;

use super::config::RigConfig;
use super::probe::ObstructionProbe;
use super::rig::{RigState, base_pitch, camera_direction, forward};

/// Per-band outcome of one probe fan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeBands {
    pub lowered: bool,
    pub direct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchDecision {
    /// Keep the offset, refresh the target pitch.
    Hold,
    /// Lower the offset one step, refresh the target pitch.
    Relax,
    /// Leave everything as it is this tick.
    Ambiguous,
    /// Raise the offset one step, refresh the target pitch.
    Raise,
}

impl PitchDecision {
    /// First match wins, in the order of the table above.
    pub fn from_bands(bands: ProbeBands) -> Self {
        match (bands.lowered, bands.direct) {
            (true, false) => Self::Hold,
            (false, false) => Self::Relax,
            (false, true) => Self::Ambiguous,
            (true, true) => Self::Raise,
        }
    }
}

/// The six-ray fan for the current state: origin, length, and directions.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeFan {
    pub origin: Vec3,
    pub distance: f32,
    pub lowered: [Vec3; 3],
    pub direct: [Vec3; 3],
}

impl ProbeFan {
    pub fn new(state: &RigState, config: &RigConfig) -> Self {
        let probe = &config.probe;
        let base = base_pitch(config, state.zoom_fraction);

        let origin = state.ground_position
            + forward(state.yaw) * probe.origin_forward
            + Vec3::Y * probe.origin_height;
        let distance = state.camera_local_offset.z.abs() + probe.distance_margin * state.zoom_fraction;

        let direct_angle = base + state.pitch_offset - probe.angle_margin;
        let lowered_angle = direct_angle - probe.angle_delta;

        let spread = probe.fan_angle * (probe.max_zoom_modifier - state.zoom_fraction);
        let headings = [state.yaw, state.yaw - spread, state.yaw + spread];

        Self {
            origin,
            distance,
            lowered: headings.map(|h| camera_direction(h, lowered_angle)),
            direct: headings.map(|h| camera_direction(h, direct_angle)),
        }
    }

    pub fn cast(&self, probe: &dyn ObstructionProbe) -> ProbeBands {
        let any_hit = |rays: &[Vec3; 3]| rays.iter().any(|&dir| probe.probe(self.origin, dir, self.distance));
        ProbeBands {
            lowered: any_hit(&self.lowered),
            direct: any_hit(&self.direct),
        }
    }
}

/// Run one physics tick of the pitch controller.
///
/// Returns the new target pitch, or `None` when the target pitch must be left
/// as it was (the dead-zone case).
pub fn update_pitch(state: &mut RigState, config: &RigConfig, probe: &dyn ObstructionProbe) -> Option<f32> {
    let bands = ProbeFan::new(state, config).cast(probe);
    let decision = PitchDecision::from_bands(bands);
    apply_decision(state, config, decision)
}

/// Apply a decision to `pitch_offset` and compute the resulting target pitch.
pub fn apply_decision(state: &mut RigState, config: &RigConfig, decision: PitchDecision) -> Option<f32> {
    let step = config.pitch.offset_step;
    let before = state.pitch_offset;

    match decision {
        PitchDecision::Hold => {}
        PitchDecision::Relax => state.pitch_offset -= step,
        PitchDecision::Ambiguous => return None,
        PitchDecision::Raise => state.pitch_offset += step,
    }
    state.pitch_offset = state.pitch_offset.clamp(0.0, config.pitch.max_offset);

    if state.pitch_offset != before {
        log::debug!(
            "pitch offset {:?}: {:.2} -> {:.2}",
            decision, before, state.pitch_offset
        );
    }

    Some(target_pitch(state, config))
}

/// Base pitch for the current zoom plus the occlusion offset.
pub fn target_pitch(state: &RigState, config: &RigConfig) -> f32 {
    base_pitch(config, state.zoom_fraction) + state.pitch_offset
}

/// Drop a vertical ray from `sky_height` onto the anchor's XZ position.
///
/// A hit updates `ground_height`; a miss keeps the last known height.
/// Returns whether the ground was found.
pub fn sample_ground_height(state: &mut RigState, config: &RigConfig, probe: &dyn ObstructionProbe) -> bool {
    let sky = config.probe.sky_height;
    let origin = Vec3::new(state.ground_position.x, sky, state.ground_position.z);

    match probe.cast(origin, Vec3::NEG_Y, f32::INFINITY) {
        Some(distance) => {
            state.ground_height = sky - distance;
            true
        }
        None => {
            log::debug!(
                "no ground under ({:.1}, {:.1}), holding height {:.2}",
                origin.x, origin.z, state.ground_height
            );
            false
        }
    }
}
