// Obstruction probing: the scene-query capability the rig consumes.
//
// The rig never owns geometry. It asks an ObstructionProbe whether a ray hits
// anything within a distance. BoxScene is a small self-contained
// implementation (axis-aligned boxes over a flat ground plane) used by the
// demo binary and by tests.

use glam::Vec3;

/// Point-to-point collision query against scene geometry.
///
/// A query that cannot be evaluated (degenerate direction, nothing collidable)
/// must report no hit. The rig treats that as "clear".
pub trait ObstructionProbe {
    /// Distance along the normalized `direction` to the first hit within
    /// `max_distance`, if any. `max_distance` may be infinite.
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32>;

    /// True if anything blocks the ray within `max_distance`.
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> bool {
        self.cast(origin, direction, max_distance).is_some()
    }
}

/// Axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min: min.min(max), max: min.max(max) }
    }

    /// Box resting on `ground_y` with its footprint centered at `center` (XZ).
    pub fn pillar(center: Vec3, size: Vec3, ground_y: f32) -> Self {
        let half = Vec3::new(size.x * 0.5, 0.0, size.z * 0.5);
        Self::new(
            Vec3::new(center.x - half.x, ground_y, center.z - half.z),
            Vec3::new(center.x + half.x, ground_y + size.y, center.z + half.z),
        )
    }

    /// Slab test. Returns the entry distance, or None if the ray misses or
    /// starts inside the box (a ray never reports the collider it starts in).
    pub fn ray_entry(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let (o, d, lo, hi) = (origin[axis], direction[axis], self.min[axis], self.max[axis]);
            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let mut t1 = (lo - o) / d;
            let mut t2 = (hi - o) / d;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_enter = t_enter.max(t1);
            t_exit = t_exit.min(t2);
            if t_enter > t_exit {
                return None;
            }
        }

        (t_enter >= 0.0).then_some(t_enter)
    }
}

/// Boxes standing on an optional infinite horizontal ground plane.
#[derive(Debug, Clone, Default)]
pub struct BoxScene {
    pub boxes: Vec<Aabb>,
    /// Height of the ground plane, if there is one.
    pub ground: Option<f32>,
}

impl BoxScene {
    pub fn new(ground: Option<f32>) -> Self {
        Self { boxes: Vec::new(), ground }
    }

    pub fn with_box(mut self, aabb: Aabb) -> Self {
        self.boxes.push(aabb);
        self
    }

    pub fn push(&mut self, aabb: Aabb) {
        self.boxes.push(aabb);
    }

    fn ground_hit(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let ground = self.ground?;
        if direction.y >= 0.0 || origin.y < ground {
            return None;
        }
        Some((origin.y - ground) / -direction.y)
    }
}

impl ObstructionProbe for BoxScene {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let direction = direction.try_normalize()?;

        self.boxes
            .iter()
            .filter_map(|b| b.ray_entry(origin, direction))
            .chain(self.ground_hit(origin, direction))
            .filter(|&t| t <= max_distance)
            .min_by(f32::total_cmp)
    }
}
