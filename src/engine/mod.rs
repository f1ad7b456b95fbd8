// Engine module - the rig, its collaborators, and the ECS glue that ticks it

pub mod camera;
pub mod components;
pub mod config;
pub mod error;
pub mod input;
pub mod interpolate;
pub mod pitch;
pub mod probe;
pub mod resolver;
pub mod rig;
pub mod scheduler;
pub mod systems;

// Re-export commonly used items
pub use camera::RigCamera;
pub use components::*;
pub use config::RigConfig;
pub use error::RigError;
pub use probe::{Aabb, BoxScene, ObstructionProbe};
pub use rig::{MapBounds, RigInput, RigPose, RigState, TargetPose};
pub use scheduler::RigScheduler;
