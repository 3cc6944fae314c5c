//! Delivery system for pending delay actions.
//!
//! This module provides [`update_delay_calls`], the exclusive system the host
//! runs once per frame after [`update_world_time`](crate::systems::time::update_world_time).
//!
//! # System Flow
//!
//! Each frame:
//!
//! 1. Read the scaled frame delta from `WorldTime`
//! 2. Discard every action whose owning entity has been despawned
//! 3. Tick each remaining action at most once; remove the finished ones
//!
//! # Reentrancy
//!
//! An action is taken out of the store while its callable runs, so callables
//! may freely schedule new actions, including under the key that is currently
//! firing. A re-registered key keeps the fresh action and drops the old
//! round. Actions registered during a tick receive their first tick on the
//! next frame.

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::resources::delaystore::{DelayStore, OwnerKey};
use crate::resources::worldtime::WorldTime;

/// Advance all pending delay actions of this world by one frame.
///
/// Does nothing on worlds without a `DelayStore`. A world that has a store
/// but no `WorldTime` is logged once per frame and skipped, since there is
/// no delta to advance by.
pub fn update_delay_calls(world: &mut World) {
    if world.get_resource::<DelayStore>().is_none() {
        return;
    }
    let Some(delta) = world.get_resource::<WorldTime>().map(|wt| wt.delta) else {
        warn!("World has a DelayStore but no WorldTime, delayed calls will not advance");
        return;
    };

    // Dead owners first: their actions are cancelled, not fired.
    for owner in world.resource::<DelayStore>().owners() {
        let OwnerKey::Entity(entity) = owner else {
            continue;
        };
        if world.get_entity(entity).is_ok() {
            continue;
        }
        let dropped = world.resource_mut::<DelayStore>().discard_owner(owner);
        debug!(
            "Owner {:?} is gone, discarded {} pending delayed call(s)",
            entity, dropped
        );
    }

    // Snapshot the keys so actions registered by callables this frame are
    // left alone until the next one.
    let mut pending: Vec<(OwnerKey, i32)> = Vec::new();
    for owner in world.resource::<DelayStore>().owners() {
        for slot in world.resource::<DelayStore>().slots_for(owner) {
            pending.push((owner, slot));
        }
    }

    for (owner, slot) in pending {
        let Some(mut call) = world.resource_mut::<DelayStore>().take(owner, slot) else {
            continue;
        };
        if call.tick(world, delta) {
            continue;
        }
        let mut store = world.resource_mut::<DelayStore>();
        if store.contains(owner, slot) {
            debug!(
                "Slot {} of {:?} was re-registered during its own callback, dropping the old action",
                slot, owner
            );
            continue;
        }
        store.add(owner, slot, call);
    }
}
