//! Time base for scheduled calls.
//!
//! Advances the [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per frame. Countdown durations are measured in the
//! scaled seconds accumulated here, so the host drives this before
//! [`update_delay_calls`](crate::systems::dispatch::update_delay_calls).

use bevy_ecs::prelude::*;
use log::warn;

use crate::resources::worldtime::WorldTime;

/// Advance elapsed time and record the frame delta.
///
/// `dt` is the unscaled frame delta in seconds. The current `time_scale`
/// is applied before `elapsed` and `delta` are written, so a paused world
/// (`time_scale == 0.0`) accumulates no time while still counting frames.
pub fn update_world_time(world: &mut World, dt: f32) {
    let Some(mut wt) = world.get_resource_mut::<WorldTime>() else {
        warn!("World has no WorldTime resource, skipping the time update");
        return;
    };
    let scaled_dt = dt * wt.time_scale;
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    wt.frame_count += 1;
}
