// Shared rig state and pose types.
//
// Angles are degrees. Yaw wraps to [0, 360); yaw = 0 faces along -Z.
// Pitch is measured downward from the horizon (0 = level, 90 = straight down),
// so the camera sits behind and above the ground anchor.
//
// Rotation is carried as scalar yaw + pitch with zero roll. A quaternion is
// only built at the boundary (RigPose::orientation) for whoever renders.

use bevy_ecs::prelude::*;
use glam::{Mat4, Quat, Vec3};

use super::config::RigConfig;

/// Normalized operator input for one control tick. Axes are typically in [-1, 1].
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct RigInput {
    /// Pan along the rig's right axis.
    pub pan_x: f32,
    /// Pan along the rig's forward axis.
    pub pan_y: f32,
    /// Positive turns the rig clockwise seen from above.
    pub rotate: f32,
    /// Scroll delta; positive zooms in.
    pub zoom: f32,
}

/// Rectangle the ground anchor is confined to: x in [0, width], z in [0, height].
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub width: f32,
    pub height: f32,
}

impl MapBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Axis-wise clamp of X and Z. Y passes through.
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            position.x.clamp(0.0, self.width),
            position.y,
            position.z.clamp(0.0, self.height),
        )
    }

    pub fn contains(&self, position: Vec3) -> bool {
        (0.0..=self.width).contains(&position.x) && (0.0..=self.height).contains(&position.z)
    }
}

/// Mutable rig state. Owned by `RigCamera`, mutated once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigState {
    /// Interpolated ground anchor. Y tracks the sampled ground height.
    pub ground_position: Vec3,
    /// Interpolated yaw, wrapped to [0, 360).
    pub yaw: f32,
    /// Interpolated pitch.
    pub pitch: f32,
    /// Occlusion correction added on top of the zoom-derived base pitch.
    /// Only the physics tick writes it. Always in [0, max_offset].
    pub pitch_offset: f32,
    /// 0 = closest and shallowest, 1 = farthest and steepest.
    pub zoom_fraction: f32,
    /// Camera offset along its own viewing axis; z = -distance.
    pub camera_local_offset: Vec3,
    /// Last ground height returned by the ground probe.
    pub ground_height: f32,
}

impl RigState {
    /// Fresh state at `anchor`: zero offsets, configured default zoom, base pitch.
    pub fn new(config: &RigConfig, anchor: Vec3) -> Self {
        let zoom_fraction = config.zoom.default_fraction.clamp(0.0, 1.0);
        Self {
            ground_position: anchor,
            yaw: 0.0,
            pitch: base_pitch(config, zoom_fraction),
            pitch_offset: 0.0,
            zoom_fraction,
            camera_local_offset: Vec3::ZERO,
            ground_height: anchor.y,
        }
    }
}

/// Desired pose the interpolator chases. Rebuilt every control tick; pitch is
/// only rewritten by the physics tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPose {
    pub ground_position: Vec3,
    /// Absolute target yaw. Not wrapped; only trigonometric equivalence matters.
    pub yaw: f32,
    pub pitch: f32,
    pub camera_local_offset: Vec3,
}

impl TargetPose {
    pub fn from_state(state: &RigState) -> Self {
        Self {
            ground_position: state.ground_position,
            yaw: state.yaw,
            pitch: state.pitch,
            camera_local_offset: state.camera_local_offset,
        }
    }
}

/// Read-only snapshot of the interpolated rig, handed to rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigPose {
    pub ground_position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub camera_local_offset: Vec3,
}

impl RigPose {
    /// Rotation mapping rig-local +Z onto the world viewing direction.
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw.to_radians() + std::f32::consts::PI)
            * Quat::from_rotation_x(self.pitch.to_radians())
    }

    /// World-space position of the camera eye.
    pub fn camera_position(&self) -> Vec3 {
        self.ground_position + self.orientation() * self.camera_local_offset
    }

    /// View matrix: looks from the camera eye along the viewing direction.
    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.camera_position();
        Mat4::look_to_rh(eye, view_direction(self.yaw, self.pitch), Vec3::Y)
    }
}

// ============================================================================
// ANGLE AND AXIS HELPERS
// ============================================================================

/// Base pitch for a zoom fraction, before any occlusion offset.
pub fn base_pitch(config: &RigConfig, zoom_fraction: f32) -> f32 {
    lerp(config.pitch.min_angle, config.pitch.max_angle, zoom_fraction)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wrap to [0, 360).
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Signed shortest rotation from `from` to `to`, in (-180, 180].
#[inline]
pub fn shortest_delta(from: f32, to: f32) -> f32 {
    let delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

/// Horizontal forward axis for a yaw. yaw = 0 gives -Z.
pub fn forward(yaw: f32) -> Vec3 {
    let (sin, cos) = yaw.to_radians().sin_cos();
    Vec3::new(-sin, 0.0, -cos)
}

/// Horizontal right axis for a yaw. yaw = 0 gives +X.
pub fn right(yaw: f32) -> Vec3 {
    let (sin, cos) = yaw.to_radians().sin_cos();
    Vec3::new(cos, 0.0, -sin)
}

/// Unit direction the camera looks along.
pub fn view_direction(yaw: f32, pitch: f32) -> Vec3 {
    let (sin_p, cos_p) = pitch.to_radians().sin_cos();
    forward(yaw) * cos_p - Vec3::Y * sin_p
}

/// Unit direction from the anchor back up toward the camera.
pub fn camera_direction(yaw: f32, pitch: f32) -> Vec3 {
    -view_direction(yaw, pitch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn test_axes_at_zero_yaw() {
        assert!(approx(forward(0.0), Vec3::NEG_Z));
        assert!(approx(right(0.0), Vec3::X));
    }

    #[test]
    fn test_axes_stay_orthonormal() {
        for yaw in [0.0, 33.0, 90.0, 181.5, 270.0, -45.0] {
            let f = forward(yaw);
            let r = right(yaw);
            assert!((f.length() - 1.0).abs() < EPS);
            assert!((r.length() - 1.0).abs() < EPS);
            assert!(f.dot(r).abs() < EPS);
        }
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert!((wrap_degrees(-90.0) - 270.0).abs() < EPS);
        assert!((wrap_degrees(725.0) - 5.0).abs() < EPS);
        assert!(wrap_degrees(-1e-7) < 360.0);
    }

    #[test]
    fn test_shortest_delta_crosses_zero() {
        assert!((shortest_delta(350.0, 10.0) - 20.0).abs() < EPS);
        assert!((shortest_delta(10.0, 350.0) + 20.0).abs() < EPS);
        assert!((shortest_delta(0.0, 180.0) - 180.0).abs() < EPS);
        assert!(shortest_delta(45.0, 45.0 + 720.0).abs() < EPS);
    }

    #[test]
    fn test_map_clamp_leaves_y() {
        let bounds = MapBounds::new(100.0, 50.0);
        let clamped = bounds.clamp(Vec3::new(-5.0, 7.0, 80.0));
        assert_eq!(clamped, Vec3::new(0.0, 7.0, 50.0));
        assert!(bounds.contains(clamped));
    }

    #[test]
    fn test_orientation_maps_local_z_to_view_direction() {
        for (yaw, pitch) in [(0.0, 30.0), (90.0, 45.0), (200.0, 10.0)] {
            let pose = RigPose {
                ground_position: Vec3::ZERO,
                yaw,
                pitch,
                camera_local_offset: Vec3::ZERO,
            };
            assert!(approx(pose.orientation() * Vec3::Z, view_direction(yaw, pitch)));
        }
    }

    #[test]
    fn test_camera_sits_behind_and_above_anchor() {
        let pose = RigPose {
            ground_position: Vec3::new(10.0, 2.0, 10.0),
            yaw: 0.0,
            pitch: 90.0,
            camera_local_offset: Vec3::new(0.0, 0.0, -15.0),
        };
        assert!(approx(pose.camera_position(), Vec3::new(10.0, 17.0, 10.0)));

        let level = RigPose { pitch: 0.0, ..pose };
        // yaw 0 looks along -Z, so the camera is pushed back along +Z
        assert!(approx(level.camera_position(), Vec3::new(10.0, 2.0, 25.0)));
    }

    #[test]
    fn test_view_matrix_puts_anchor_in_front() {
        let pose = RigPose {
            ground_position: Vec3::new(3.0, 0.0, -4.0),
            yaw: 120.0,
            pitch: 40.0,
            camera_local_offset: Vec3::new(0.0, 0.0, -12.0),
        };
        let anchor_view = pose.view_matrix().transform_point3(pose.ground_position);
        // right-handed view space looks down -Z
        assert!(anchor_view.x.abs() < 1e-3);
        assert!(anchor_view.y.abs() < 1e-3);
        assert!((anchor_view.z + 12.0).abs() < 1e-3);
    }
}
