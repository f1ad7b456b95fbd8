// ECS systems that drive rigs from the two clocks
// Control-tick systems run once per frame; rig_physics_system runs per fixed step

use bevy_ecs::prelude::*;
use glam::Vec3;

use super::camera::RigCamera;
use super::components::*;
use super::probe::ObstructionProbe;
use super::rig::{MapBounds, RigInput};

/// Variable frame duration of the current control tick, in seconds.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FrameTime {
    pub delta: f32,
}

/// Scene query service shared by every rig in the world.
#[derive(Resource)]
pub struct SceneProbe(pub Box<dyn ObstructionProbe + Send + Sync>);

/// Snap a rig's anchor to a position (e.g. "show me this unit").
/// `rig: None` moves every rig.
#[derive(Event, Debug, Clone, Copy)]
pub struct CameraJump {
    pub rig: Option<Entity>,
    pub position: Vec3,
}

/// Update entity positions based on velocity
pub fn movement_system(time: Res<FrameTime>, mut query: Query<(&mut Transform, &Velocity)>) {
    for (mut transform, velocity) in query.iter_mut() {
        transform.position += velocity.linear * time.delta;
    }
}

/// Keep moving entities inside the map by reflecting them off its edges
pub fn bounds_system(bounds: Res<MapBounds>, mut query: Query<(&mut Transform, &mut Velocity)>) {
    for (mut transform, mut velocity) in query.iter_mut() {
        let p = &mut transform.position;
        let v = &mut velocity.linear;

        if p.x < 0.0 || p.x > bounds.width {
            p.x = p.x.clamp(0.0, bounds.width);
            v.x = -v.x;
        }
        if p.z < 0.0 || p.z > bounds.height {
            p.z = p.z.clamp(0.0, bounds.height);
            v.z = -v.z;
        }
    }
}

/// Apply pending camera jumps before input is resolved
pub fn camera_jump_system(mut jumps: EventReader<CameraJump>, mut rigs: Query<(Entity, &mut RigCamera)>) {
    for jump in jumps.read() {
        for (entity, mut rig) in rigs.iter_mut() {
            if jump.rig.is_none_or(|target| target == entity) {
                rig.set_ground_anchor(jump.position);
            }
        }
    }
}

/// Resolve input and smooth every rig toward its target
pub fn rig_control_system(
    time: Res<FrameTime>,
    input: Res<RigInput>,
    mut rigs: Query<(&mut RigCamera, Option<&FollowTarget>)>,
    targets: Query<&Transform>,
) {
    for (mut rig, follow) in rigs.iter_mut() {
        let follow_position = follow.and_then(|f| targets.get(f.0).ok()).map(|t| t.position);
        rig.control_tick(&input, follow_position, time.delta);
    }
}

/// Ground sampling and occlusion-driven pitch, one fixed step
pub fn rig_physics_system(probe: Res<SceneProbe>, mut rigs: Query<&mut RigCamera>) {
    for mut rig in rigs.iter_mut() {
        rig.physics_tick(probe.0.as_ref());
    }
}
