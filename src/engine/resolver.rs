// Target-state resolver: turns one control tick of input into a target pose.
//
// Movement is relative to the rig's current facing, so pan-Y always pushes
// the view "into the screen" no matter how the rig has been rotated. The
// candidate anchor is clamped to the map rectangle first, then radially to the
// follow target (if any). The resolver issues no scene queries.

use glam::Vec3;

use super::config::RigConfig;
use super::rig::{RigInput, RigState, TargetPose, forward, lerp, right, shortest_delta};

/// Resolve the target pose for this tick.
///
/// `previous` supplies the pending target yaw and the pitch last set by the
/// physics tick. The pending yaw is re-expressed within half a turn of the
/// rig's wrapped yaw before accumulating, so it stays bounded however long the
/// rig spins. `zoom_fraction` is updated in place on `state`.
pub fn resolve(
    state: &mut RigState,
    previous: &TargetPose,
    input: &RigInput,
    follow: Option<Vec3>,
    config: &RigConfig,
    dt: f32,
) -> TargetPose {
    let candidate = pan_candidate(state.ground_position, state.yaw, input, config.movement.move_speed, dt);
    let mut ground_position = config.map.bounds().clamp(candidate);
    if let Some(target) = follow {
        ground_position = clamp_to_radius(ground_position, target, config.map.follow_radius);
    }
    ground_position.y = state.ground_height;

    state.zoom_fraction = advance_zoom(state.zoom_fraction, input.zoom, config.movement.zoom_speed, dt);

    TargetPose {
        ground_position,
        yaw: advance_yaw(
            state.yaw + shortest_delta(state.yaw, previous.yaw),
            input.rotate,
            config.movement.rotation_speed,
            dt,
        ),
        pitch: previous.pitch,
        camera_local_offset: Vec3::new(0.0, 0.0, -zoom_distance(config, state.zoom_fraction)),
    }
}

/// Anchor moved along the rig's local right/forward axes by the pan input.
pub fn pan_candidate(position: Vec3, yaw: f32, input: &RigInput, speed: f32, dt: f32) -> Vec3 {
    position
        + right(yaw) * (input.pan_x * speed * dt)
        + forward(yaw) * (input.pan_y * speed * dt)
}

/// Keep `position` within `radius` of `target` on the ground plane.
///
/// The offset is rescaled, not clamped per axis, so the allowed area is a
/// disc. A non-positive radius disables the clamp.
pub fn clamp_to_radius(position: Vec3, target: Vec3, radius: f32) -> Vec3 {
    if radius <= 0.0 {
        return position;
    }
    let offset = Vec3::new(position.x - target.x, 0.0, position.z - target.z);
    if offset.length_squared() <= radius * radius {
        return position;
    }
    let clamped = offset.normalize() * radius;
    Vec3::new(target.x + clamped.x, position.y, target.z + clamped.z)
}

/// Accumulate yaw. Positive rotate input turns toward negative yaw.
pub fn advance_yaw(yaw: f32, rotate: f32, rotation_speed: f32, dt: f32) -> f32 {
    yaw + rotate * -rotation_speed * dt
}

/// Scroll up (positive) zooms in. Always returns a value in [0, 1].
pub fn advance_zoom(zoom_fraction: f32, scroll: f32, zoom_speed: f32, dt: f32) -> f32 {
    (zoom_fraction + scroll * -zoom_speed * dt).clamp(0.0, 1.0)
}

/// Camera distance behind the rig for a zoom fraction.
pub fn zoom_distance(config: &RigConfig, zoom_fraction: f32) -> f32 {
    lerp(config.zoom.min_distance, config.zoom.max_distance, zoom_fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rig::wrap_degrees;

    const EPS: f32 = 1e-4;

    fn state_at(config: &RigConfig, position: Vec3) -> RigState {
        RigState::new(config, position)
    }

    fn pan(x: f32, y: f32) -> RigInput {
        RigInput { pan_x: x, pan_y: y, ..Default::default() }
    }

    #[test]
    fn test_pan_moves_along_local_right() {
        // movingSpeed 100, dt 0.1 => 10 units along the right axis
        let candidate = pan_candidate(Vec3::new(50.0, 0.0, 50.0), 0.0, &pan(1.0, 0.0), 100.0, 0.1);
        assert!((candidate - Vec3::new(60.0, 0.0, 50.0)).length() < EPS);

        // rotated rig: right axis follows yaw
        let yaw = 90.0;
        let candidate = pan_candidate(Vec3::ZERO, yaw, &pan(1.0, 0.0), 100.0, 0.1);
        assert!((candidate - right(yaw) * 10.0).length() < EPS);
        assert!((candidate.length() - 10.0).abs() < EPS);
    }

    #[test]
    fn test_pan_forward_at_zero_yaw_is_negative_z() {
        let candidate = pan_candidate(Vec3::new(5.0, 0.0, 5.0), 0.0, &pan(0.0, 1.0), 10.0, 0.5);
        assert!((candidate - Vec3::new(5.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_resolve_clamps_to_map() {
        let config = RigConfig::default();
        let mut state = state_at(&config, Vec3::new(95.0, 0.0, 3.0));
        let previous = TargetPose::from_state(&state);

        let target = resolve(&mut state, &previous, &pan(1.0, 1.0), None, &config, 0.5);
        assert_eq!(target.ground_position.x, config.map.width);
        assert_eq!(target.ground_position.z, 0.0);
    }

    #[test]
    fn test_resolve_reaches_bound_exactly_without_overshoot() {
        let config = RigConfig::default();
        // exactly 10 units to the right edge
        let mut state = state_at(&config, Vec3::new(90.0, 0.0, 50.0));
        let previous = TargetPose::from_state(&state);

        let target = resolve(&mut state, &previous, &pan(1.0, 0.0), None, &config, 0.1);
        assert!(target.ground_position.x <= config.map.width);
        assert!((target.ground_position.x - config.map.width).abs() < EPS);
    }

    #[test]
    fn test_resolve_stays_in_map_for_any_pan() {
        let config = RigConfig::default();
        let inputs = [-1.0, -0.5, 0.0, 0.3, 1.0];
        for &x in &inputs {
            for &y in &inputs {
                for yaw in [0.0, 45.0, 170.0, 300.0] {
                    let mut state = state_at(&config, Vec3::new(2.0, 0.0, 98.0));
                    state.yaw = yaw;
                    let previous = TargetPose::from_state(&state);
                    let target = resolve(&mut state, &previous, &pan(x, y), None, &config, 1.0);
                    assert!(config.map.bounds().contains(target.ground_position));
                }
            }
        }
    }

    #[test]
    fn test_radius_clamp_is_radial() {
        let target = Vec3::new(50.0, 0.0, 50.0);
        let clamped = clamp_to_radius(Vec3::new(60.0, 0.0, 60.0), target, 5.0);
        let offset = clamped - target;
        assert!((offset.length() - 5.0).abs() < EPS);
        // same direction as the requested offset, not an axis-wise box clamp
        assert!((offset.x - offset.z).abs() < EPS);
    }

    #[test]
    fn test_radius_clamp_inside_or_disabled_is_identity() {
        let target = Vec3::new(50.0, 0.0, 50.0);
        let inside = Vec3::new(52.0, 0.0, 49.0);
        assert_eq!(clamp_to_radius(inside, target, 5.0), inside);

        let far = Vec3::new(90.0, 0.0, 10.0);
        assert_eq!(clamp_to_radius(far, target, 0.0), far);
    }

    #[test]
    fn test_resolve_respects_follow_radius() {
        let mut config = RigConfig::default();
        config.map.follow_radius = 8.0;
        let follow = Vec3::new(40.0, 0.0, 40.0);

        for (x, y) in [(1.0, 0.0), (-1.0, 1.0), (0.7, -0.7), (0.0, -1.0)] {
            let mut state = state_at(&config, follow);
            for _ in 0..20 {
                let previous = TargetPose::from_state(&state);
                let target = resolve(&mut state, &previous, &pan(x, y), Some(follow), &config, 0.05);
                let distance = (target.ground_position - follow).length();
                assert!(distance <= config.map.follow_radius + EPS, "distance {distance}");
                state.ground_position = target.ground_position;
            }
        }
    }

    #[test]
    fn test_yaw_accumulates_against_input_sign() {
        let yaw = advance_yaw(10.0, 1.0, 100.0, 0.1);
        assert!((yaw - 0.0).abs() < EPS);
        let yaw = advance_yaw(yaw, -0.5, 100.0, 0.2);
        assert!((yaw - 10.0).abs() < EPS);
    }

    #[test]
    fn test_resolve_accumulates_on_previous_target_yaw() {
        let config = RigConfig::default();
        let mut state = state_at(&config, Vec3::new(50.0, 0.0, 50.0));
        let mut previous = TargetPose::from_state(&state);
        // a full turn ahead of the rig is the same heading as 40
        previous.yaw = 400.0;

        let input = RigInput { rotate: -1.0, ..Default::default() };
        let target = resolve(&mut state, &previous, &input, None, &config, 0.1);
        assert!((target.yaw - 50.0).abs() < EPS);
    }

    #[test]
    fn test_long_rotation_keeps_target_yaw_bounded() {
        let config = RigConfig::default();
        let mut state = state_at(&config, Vec3::new(50.0, 0.0, 50.0));
        let mut target = TargetPose::from_state(&state);
        let input = RigInput { rotate: -1.0, ..Default::default() };
        let dt = 1.0 / 60.0;
        let step = config.movement.rotation_speed * dt;

        // about 28 full turns
        for _ in 0..6000 {
            let next = resolve(&mut state, &target, &input, None, &config, dt);
            let pending = shortest_delta(state.yaw, target.yaw);
            assert!((next.yaw - (state.yaw + pending + step)).abs() < 1e-3);
            assert!(next.yaw.abs() < 720.0, "target yaw {}", next.yaw);
            target = next;
            state.yaw = wrap_degrees(target.yaw);
        }
    }

    #[test]
    fn test_zoom_clamped_for_extreme_scroll() {
        let mut zoom = 0.5;
        for scroll in [1e6, -1e6, 3.0, -0.01, f32::MAX, f32::MIN] {
            zoom = advance_zoom(zoom, scroll, 10.0, 0.016);
            assert!((0.0..=1.0).contains(&zoom), "zoom {zoom} after scroll {scroll}");
        }
    }

    #[test]
    fn test_scroll_up_zooms_in() {
        let zoom = advance_zoom(0.5, 1.0, 10.0, 0.01);
        assert!((zoom - 0.4).abs() < EPS);
    }

    #[test]
    fn test_local_offset_behind_camera() {
        let config = RigConfig::default();
        let mut state = state_at(&config, Vec3::new(50.0, 0.0, 50.0));
        state.zoom_fraction = 0.5;
        let previous = TargetPose::from_state(&state);

        let target = resolve(&mut state, &previous, &RigInput::default(), None, &config, 0.016);
        let expected = -lerp(config.zoom.min_distance, config.zoom.max_distance, 0.5);
        assert!((target.camera_local_offset.z - expected).abs() < EPS);
        assert_eq!(target.camera_local_offset.x, 0.0);
        assert_eq!(target.camera_local_offset.y, 0.0);
    }

    #[test]
    fn test_target_height_is_sampled_ground() {
        let config = RigConfig::default();
        let mut state = state_at(&config, Vec3::new(50.0, 0.0, 50.0));
        state.ground_height = 7.5;
        let previous = TargetPose::from_state(&state);

        let target = resolve(&mut state, &previous, &pan(1.0, 0.0), None, &config, 0.016);
        assert_eq!(target.ground_position.y, 7.5);
    }
}
