//! Public scheduling entry points.
//!
//! Four families assemble a bound invocation, wrap it in a countdown, and
//! hand it to the world's [`DelayStore`]:
//!
//! - [`schedule_by_name`] – late-bound dispatch through the [`CallbackStore`]
//! - [`schedule_callable`] / [`schedule_callable_repeating`] – free closures
//! - [`schedule_member`] / [`schedule_member_repeating`] – entity methods
//! - [`schedule_raw`] / [`schedule_raw_repeating`] – methods on plain shared
//!   objects outside the ECS
//!
//! Every entry point takes an explicit slot id or the [`AUTO_SLOT`] sentinel
//! and returns the resolved slot, or [`INVALID_SLOT`] when nothing could be
//! registered. Registering under a key that is already pending either resets
//! the existing countdown (`retriggerable = true`) or drops the new request;
//! the already-bound callable is never replaced.
//!
//! The `*_next_tick` wrappers schedule with duration zero under a fresh
//! slot; such actions fire on the very next tick even if no time has passed.
//! [`run_on_tick`] skips the countdown entirely and runs its functor every
//! frame until it reports done.

use std::sync::{Arc, Mutex};

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::actions::delaycall::DelayCall;
use crate::actions::invocation::BoundInvocation;
use crate::resources::callbackstore::{CallbackId, CallbackStore};
use crate::resources::delaystore::{AUTO_SLOT, DelayStore, INVALID_SLOT, OwnerKey};

/// Register a prebuilt action under `(owner, slot)`.
///
/// This is the low-level form the sugared entry points lower onto; use it
/// directly when the [`DelayCall`] was assembled elsewhere. Passing
/// [`AUTO_SLOT`] picks a fresh slot that cannot collide with a live key.
/// When the key is already occupied, the incoming request's
/// `retriggerable` flag decides the outcome (pending actions store no flag
/// of their own): a retriggerable request resets the existing countdown to
/// the new call's duration, while any other request is dropped. The
/// existing callable stays either way.
/// Returns the resolved slot, or [`INVALID_SLOT`] when the world has no
/// `DelayStore` or the owning entity is already despawned.
pub fn schedule_action(
    world: &mut World,
    owner: OwnerKey,
    slot: i32,
    retriggerable: bool,
    call: DelayCall,
) -> i32 {
    if let OwnerKey::Entity(entity) = owner {
        if world.get_entity(entity).is_err() {
            warn!(
                "Cannot schedule a delayed call for despawned entity {:?}",
                entity
            );
            return INVALID_SLOT;
        }
    }
    let Some(mut store) = world.get_resource_mut::<DelayStore>() else {
        warn!("World has no DelayStore, delayed call not registered");
        return INVALID_SLOT;
    };
    let slot = if slot == AUTO_SLOT {
        store.unique_slot(owner)
    } else {
        slot
    };
    if let Some(existing) = store.find_existing(owner, slot) {
        if retriggerable {
            if let Some(duration) = call.duration() {
                existing.set_duration(duration);
            }
        } else {
            debug!(
                "Slot {} of {:?} already has a pending call, ignoring the new one",
                slot, owner
            );
        }
        return slot;
    }
    store.add(owner, slot, call);
    slot
}

/// Register a one-shot system as a named callback for [`schedule_by_name`].
///
/// The system receives the target entity and reports completion; returning
/// false keeps a repeating countdown running. Registering an in-use name
/// rebinds it. Inserts a [`CallbackStore`] into the world if it has none.
pub fn register_callback<S, M>(
    world: &mut World,
    name: impl Into<String>,
    system: S,
) -> CallbackId
where
    S: IntoSystem<In<Entity>, bool, M> + 'static,
{
    let id = world.register_system(system);
    if world.get_resource::<CallbackStore>().is_none() {
        world.insert_resource(CallbackStore::new());
    }
    world.resource_mut::<CallbackStore>().insert(name, id);
    id
}

/// Schedule a call to the callback registered under `function`, owned by
/// `target`.
///
/// The name is resolved when the countdown fires, not now, so the callback
/// may be registered later. The callback's report is honored: returning
/// false rearms the countdown for another round.
pub fn schedule_by_name(
    world: &mut World,
    target: Entity,
    slot: i32,
    function: impl Into<String>,
    duration: f32,
    retriggerable: bool,
) -> i32 {
    let cell = BoundInvocation::by_name(target, function);
    schedule_action(
        world,
        OwnerKey::Entity(target),
        slot,
        retriggerable,
        DelayCall::repeating(duration, cell),
    )
}

/// Run the callback registered under `function` on the very next tick.
pub fn schedule_by_name_next_tick(
    world: &mut World,
    target: Entity,
    function: impl Into<String>,
) -> i32 {
    schedule_by_name(world, target, AUTO_SLOT, function, 0.0, false)
}

/// Schedule a closure to run once, `duration` scaled seconds from now.
pub fn schedule_callable<F>(
    world: &mut World,
    slot: i32,
    duration: f32,
    retriggerable: bool,
    mut f: F,
) -> i32
where
    F: FnMut(&mut World) + Send + Sync + 'static,
{
    let cell = BoundInvocation::callable(move |world| {
        f(world);
        true
    });
    schedule_action(
        world,
        OwnerKey::World,
        slot,
        retriggerable,
        DelayCall::once(duration, cell),
    )
}

/// Schedule a closure to run every `duration` scaled seconds until it
/// returns true.
pub fn schedule_callable_repeating<F>(
    world: &mut World,
    slot: i32,
    duration: f32,
    retriggerable: bool,
    f: F,
) -> i32
where
    F: FnMut(&mut World) -> bool + Send + Sync + 'static,
{
    schedule_action(
        world,
        OwnerKey::World,
        slot,
        retriggerable,
        DelayCall::repeating(duration, BoundInvocation::callable(f)),
    )
}

/// Run a closure on the very next tick.
pub fn schedule_callable_next_tick<F>(world: &mut World, f: F) -> i32
where
    F: FnMut(&mut World) + Send + Sync + 'static,
{
    schedule_callable(world, AUTO_SLOT, 0.0, false, f)
}

/// Schedule a method-style call on `target` to run once. `args` is
/// snapshotted now and handed to the method as a clone when it fires.
pub fn schedule_member<F, A>(
    world: &mut World,
    target: Entity,
    slot: i32,
    duration: f32,
    retriggerable: bool,
    mut method: F,
    args: A,
) -> i32
where
    F: FnMut(&mut World, Entity, A) + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
{
    let cell = BoundInvocation::member(
        target,
        move |world, entity, args| {
            method(world, entity, args);
            true
        },
        args,
    );
    schedule_action(
        world,
        OwnerKey::Entity(target),
        slot,
        retriggerable,
        DelayCall::once(duration, cell),
    )
}

/// Schedule a method-style call on `target` to run every `duration` scaled
/// seconds until it returns true.
pub fn schedule_member_repeating<F, A>(
    world: &mut World,
    target: Entity,
    slot: i32,
    duration: f32,
    retriggerable: bool,
    method: F,
    args: A,
) -> i32
where
    F: FnMut(&mut World, Entity, A) -> bool + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
{
    let cell = BoundInvocation::member(target, method, args);
    schedule_action(
        world,
        OwnerKey::Entity(target),
        slot,
        retriggerable,
        DelayCall::repeating(duration, cell),
    )
}

/// Run a method-style call on `target` on the very next tick.
pub fn schedule_member_next_tick<F, A>(world: &mut World, target: Entity, method: F, args: A) -> i32
where
    F: FnMut(&mut World, Entity, A) + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
{
    schedule_member(world, target, AUTO_SLOT, 0.0, false, method, args)
}

/// Schedule a method call on a plain shared object to run once.
///
/// Only a weak handle to `target` is kept; if the caller drops the last
/// [`Arc`] before the countdown fires, the action retires with a warning
/// instead of running.
pub fn schedule_raw<C, F, A>(
    world: &mut World,
    target: &Arc<Mutex<C>>,
    slot: i32,
    duration: f32,
    retriggerable: bool,
    mut method: F,
    args: A,
) -> i32
where
    C: Send + 'static,
    F: FnMut(&mut C, A) + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
{
    let cell = BoundInvocation::raw(
        target,
        move |object: &mut C, args: A| {
            method(object, args);
            true
        },
        args,
    );
    schedule_action(
        world,
        OwnerKey::World,
        slot,
        retriggerable,
        DelayCall::once(duration, cell),
    )
}

/// Schedule a method call on a plain shared object to run every `duration`
/// scaled seconds until it returns true.
pub fn schedule_raw_repeating<C, F, A>(
    world: &mut World,
    target: &Arc<Mutex<C>>,
    slot: i32,
    duration: f32,
    retriggerable: bool,
    method: F,
    args: A,
) -> i32
where
    C: Send + 'static,
    F: FnMut(&mut C, A) -> bool + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
{
    let cell = BoundInvocation::raw(target, method, args);
    schedule_action(
        world,
        OwnerKey::World,
        slot,
        retriggerable,
        DelayCall::repeating(duration, cell),
    )
}

/// Run a method call on a plain shared object on the very next tick.
pub fn schedule_raw_next_tick<C, F, A>(
    world: &mut World,
    target: &Arc<Mutex<C>>,
    method: F,
    args: A,
) -> i32
where
    C: Send + 'static,
    F: FnMut(&mut C, A) + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
{
    schedule_raw(world, target, AUTO_SLOT, 0.0, false, method, args)
}

/// Run `f` on every tick with the frame delta until it returns true.
/// Always registered under a fresh slot.
pub fn run_on_tick<F>(world: &mut World, f: F) -> i32
where
    F: FnMut(&mut World, f32) -> bool + Send + Sync + 'static,
{
    schedule_action(
        world,
        OwnerKey::World,
        AUTO_SLOT,
        false,
        DelayCall::per_tick(f),
    )
}
