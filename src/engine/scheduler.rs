// Two-clock driver for rig worlds.
//
// advance(frame_dt) first drains the fixed-step accumulator, running the
// physics schedule zero or more times, then runs the control schedule once
// with the variable frame time. Both schedules run single-threaded.

use bevy_ecs::event::Events;
use bevy_ecs::prelude::*;
use bevy_ecs::schedule::{ExecutorKind, ScheduleLabel};
use glam::Vec3;

use super::config::RigConfig;
use super::probe::ObstructionProbe;
use super::rig::RigInput;
use super::systems::*;

/// Physics steps allowed per frame before the backlog is dropped.
pub const MAX_PHYSICS_STEPS_PER_FRAME: u32 = 8;

#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlTick;

#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysicsTick;

pub struct RigScheduler {
    pub world: World,
    control: Schedule,
    physics: Schedule,
    step: f32,
    accumulator: f32,
}

impl RigScheduler {
    /// World with the frame clock, input, map bounds, jump events and `probe`
    /// installed. Spawn rigs and follow targets into `world` afterwards.
    pub fn new(config: &RigConfig, probe: impl ObstructionProbe + Send + Sync + 'static) -> Self {
        let mut world = World::new();
        world.insert_resource(FrameTime::default());
        world.insert_resource(RigInput::default());
        world.insert_resource(config.map.bounds());
        world.insert_resource(SceneProbe(Box::new(probe)));
        world.init_resource::<Events<CameraJump>>();

        let mut control = Schedule::new(ControlTick);
        control.set_executor_kind(ExecutorKind::SingleThreaded);
        control.add_systems(
            (camera_jump_system, movement_system, bounds_system, rig_control_system).chain(),
        );

        let mut physics = Schedule::new(PhysicsTick);
        physics.set_executor_kind(ExecutorKind::SingleThreaded);
        physics.add_systems(rig_physics_system);

        Self {
            world,
            control,
            physics,
            step: config.physics_step,
            accumulator: 0.0,
        }
    }

    /// Input the next control tick will consume.
    pub fn set_input(&mut self, input: RigInput) {
        *self.world.resource_mut::<RigInput>() = input;
    }

    /// Queue a jump for `rig` (or every rig); applied on the next control tick.
    pub fn jump(&mut self, rig: Option<Entity>, position: Vec3) {
        self.world.send_event(CameraJump { rig, position });
    }

    /// Advance one rendered frame. Returns how many physics steps ran.
    /// A negative `frame_dt` is treated as zero by both clocks.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let frame_dt = frame_dt.max(0.0);
        self.accumulator += frame_dt;

        let mut steps = 0;
        while self.accumulator >= self.step {
            if steps == MAX_PHYSICS_STEPS_PER_FRAME {
                log::warn!(
                    "physics fell behind by {:.3}s, dropping backlog",
                    self.accumulator
                );
                self.accumulator = 0.0;
                break;
            }
            self.physics.run(&mut self.world);
            self.accumulator -= self.step;
            steps += 1;
        }

        self.world.resource_mut::<FrameTime>().delta = frame_dt;
        self.control.run(&mut self.world);
        self.world.resource_mut::<Events<CameraJump>>().update();

        steps
    }

    pub fn physics_step(&self) -> f32 {
        self.step
    }
}
