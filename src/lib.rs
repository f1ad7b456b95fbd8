// Adaptive top-down camera rig: pan/rotate/zoom over a bounded ground area,
// with a pitch controller that tilts the view up to clear obstructions.

pub mod engine;
