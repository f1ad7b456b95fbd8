// Occlusion-aware rig camera
//
// Camera model:
//   - A ground anchor on the XZ plane (Y = sampled ground height) the camera looks at
//   - Yaw (horizontal facing) and pitch (angle below the horizon)
//   - Zoom fraction mapped onto a distance along the camera's viewing axis
//   - Pan input moves the anchor relative to the rig's facing
//   - Pitch tilts up on its own when probes find the view blocked
//
// Two clocks drive it. control_tick() runs once per rendered frame with a
// variable dt: resolve the target pose from input, then blend toward it.
// physics_tick() runs at a fixed rate: sample ground height, then run the
// pitch controller. Only physics_tick() touches pitch_offset.

use bevy_ecs::prelude::*;
use glam::{Mat4, Vec3};

use super::config::RigConfig;
use super::interpolate::interpolate;
use super::pitch::{sample_ground_height, update_pitch};
use super::probe::ObstructionProbe;
use super::resolver::resolve;
use super::rig::{RigInput, RigPose, RigState, TargetPose};

#[derive(Component, Debug, Clone)]
pub struct RigCamera {
    /// Tunables, read every tick. `physics_step` is ignored here: the tick
    /// length is global to the `RigScheduler` and fixed at construction.
    pub config: RigConfig,

    /// Private: only the tick functions and set_ground_anchor() mutate it.
    state: RigState,

    /// Private: rebuilt every control tick; pitch is owned by the physics tick.
    target: TargetPose,
}

impl RigCamera {
    /// Rig resting at `anchor` with zero offsets and the configured default zoom.
    ///
    /// `config` is trusted as-is; see `RigConfig::validate` for the preconditions.
    pub fn new(config: RigConfig, anchor: Vec3) -> Self {
        let state = RigState::new(&config, config.map.bounds().clamp(anchor));
        Self {
            target: TargetPose::from_state(&state),
            state,
            config,
        }
    }

    /// Variable-rate update: resolve input into a target, then smooth toward it.
    /// `follow` is the follow target's position, if the rig has one.
    pub fn control_tick(&mut self, input: &RigInput, follow: Option<Vec3>, dt: f32) {
        self.target = resolve(&mut self.state, &self.target, input, follow, &self.config, dt);
        interpolate(&mut self.state, &self.target, &self.config.smoothing, dt);
    }

    /// Fixed-rate update: ground height, then occlusion-driven pitch.
    pub fn physics_tick(&mut self, probe: &dyn ObstructionProbe) {
        sample_ground_height(&mut self.state, &self.config, probe);
        if let Some(pitch) = update_pitch(&mut self.state, &self.config, probe) {
            self.target.pitch = pitch;
        }
    }

    /// Snap the anchor to `position` without interpolation (camera jumps).
    /// X/Z are clamped to the map; Y becomes the held ground height until the
    /// next ground sample.
    pub fn set_ground_anchor(&mut self, position: Vec3) {
        let anchor = self.config.map.bounds().clamp(position);
        log::debug!(
            "rig anchor jump ({:.1}, {:.1}, {:.1}) -> ({:.1}, {:.1}, {:.1})",
            self.state.ground_position.x,
            self.state.ground_position.y,
            self.state.ground_position.z,
            anchor.x,
            anchor.y,
            anchor.z
        );
        self.state.ground_position = anchor;
        self.state.ground_height = anchor.y;
        self.target.ground_position = anchor;
    }

    /// Interpolated pose for whoever renders the rig.
    pub fn pose(&self) -> RigPose {
        RigPose {
            ground_position: self.state.ground_position,
            yaw: self.state.yaw,
            pitch: self.state.pitch,
            camera_local_offset: self.state.camera_local_offset,
        }
    }

    /// World-space position of the camera eye.
    pub fn camera_position(&self) -> Vec3 {
        self.pose().camera_position()
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.pose().view_matrix()
    }

    pub fn state(&self) -> &RigState {
        &self.state
    }

    pub fn target(&self) -> &TargetPose {
        &self.target
    }

    pub fn zoom_fraction(&self) -> f32 {
        self.state.zoom_fraction
    }

    pub fn pitch_offset(&self) -> f32 {
        self.state.pitch_offset
    }
}
