// ECS components for rigs and the things they follow
// The rig itself (RigCamera) is a component too; see camera.rs

use bevy_ecs::prelude::*;
use glam::Vec3;

/// Position of an entity in 3D space
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Transform {
    pub position: Vec3,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position }
    }
}

/// Velocity of an entity in 3D space (units per second)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Velocity {
    pub linear: Vec3,
}

impl Velocity {
    pub fn new(linear: Vec3) -> Self {
        Self { linear }
    }
}

/// Points a rig at another entity. The target's `Transform` feeds the
/// resolver's follow-radius clamp every control tick.
#[derive(Component, Debug, Clone, Copy)]
pub struct FollowTarget(pub Entity);
