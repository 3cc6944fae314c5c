//! Per-world clock consumed by the delayed-call machinery.

use bevy_ecs::prelude::Resource;

/// Scaled time for one world.
///
/// `delta` is what the delivery system subtracts from every pending
/// countdown each frame, so durations are measured in scaled seconds. A
/// paused world keeps `time_scale` at zero; frames still count, seconds
/// do not.
#[derive(Resource, Clone, Copy)]
pub struct WorldTime {
    /// Scaled seconds accumulated since the world was created.
    pub elapsed: f32,
    /// Scaled seconds covered by the most recent frame.
    pub delta: f32,
    /// Multiplier applied to raw frame deltas. 1.0 is real time.
    pub time_scale: f32,
    /// Frames ticked so far, unaffected by `time_scale`.
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// Builder-style override for the time multiplier.
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}
