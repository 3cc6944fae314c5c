//! Multi-world container and tick driver.
//!
//! [`Worlds`] owns a set of tagged [`World`]s and drives their per-frame
//! updates. Hosts that manage their own worlds do not need it; they run
//! [`update_world_time`] and [`update_delay_calls`] themselves. It exists
//! for callers that want the classic resolution policy "schedule on the
//! running play world if there is one, otherwise on the editor world".
//!
//! Dropping a world (see [`Worlds::retain_worlds`]) discards its pending
//! actions without firing them.

use std::sync::{Arc, Mutex};

use bevy_ecs::prelude::*;
use log::warn;

use crate::resources::callbackstore::CallbackStore;
use crate::resources::delaystore::{DelayStore, INVALID_SLOT};
use crate::resources::worldtime::WorldTime;
use crate::schedule;
use crate::systems::dispatch::update_delay_calls;
use crate::systems::time::update_world_time;

/// What role a world plays for the resolution policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldKind {
    /// A running game/simulation world. Preferred for scheduling.
    Play,
    /// An editor world. Used when no play world exists.
    Editor,
}

struct WorldEntry {
    kind: WorldKind,
    world: World,
}

/// An owned set of worlds, each preconfigured for deferred calls.
#[derive(Default)]
pub struct Worlds {
    entries: Vec<WorldEntry>,
}

impl Worlds {
    pub fn new() -> Self {
        Worlds {
            entries: Vec::new(),
        }
    }

    /// Create a world of the given kind with `WorldTime`, `DelayStore`, and
    /// `CallbackStore` already inserted, and return it for further setup.
    pub fn add_world(&mut self, kind: WorldKind) -> &mut World {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(DelayStore::new());
        world.insert_resource(CallbackStore::new());
        self.entries.push(WorldEntry { kind, world });
        let last = self.entries.len() - 1;
        &mut self.entries[last].world
    }

    /// First world matching the predicate, in insertion order.
    pub fn find_world<P>(&mut self, mut pred: P) -> Option<&mut World>
    where
        P: FnMut(WorldKind, &World) -> bool,
    {
        self.entries
            .iter_mut()
            .find(|entry| pred(entry.kind, &entry.world))
            .map(|entry| &mut entry.world)
    }

    /// The world scheduling falls back to when the caller names none: the
    /// first play world, else the first editor world, else `None`.
    pub fn preferred_world(&mut self) -> Option<&mut World> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.kind == WorldKind::Play)
            .or_else(|| {
                self.entries
                    .iter()
                    .position(|entry| entry.kind == WorldKind::Editor)
            })?;
        Some(&mut self.entries[index].world)
    }

    /// The first world that contains `entity`. Entity ids are per-world, so
    /// with several live worlds an id can in principle match more than one;
    /// insertion order breaks the tie.
    pub fn world_of(&mut self, entity: Entity) -> Option<&mut World> {
        self.find_world(|_, world| world.get_entity(entity).is_ok())
    }

    /// Visit every world in insertion order.
    pub fn for_each_world<F>(&mut self, mut f: F)
    where
        F: FnMut(WorldKind, &mut World),
    {
        for entry in &mut self.entries {
            f(entry.kind, &mut entry.world);
        }
    }

    /// Keep only the worlds matching the predicate. Dropped worlds take all
    /// of their pending actions with them.
    pub fn retain_worlds<P>(&mut self, mut pred: P)
    where
        P: FnMut(WorldKind, &World) -> bool,
    {
        self.entries.retain(|entry| pred(entry.kind, &entry.world));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advance every world by one frame: time update, then delivery.
    pub fn tick(&mut self, dt: f32) {
        for entry in &mut self.entries {
            update_world_time(&mut entry.world, dt);
            update_delay_calls(&mut entry.world);
        }
    }

    /// [`schedule::schedule_callable`] on the preferred world.
    pub fn schedule_callable<F>(
        &mut self,
        slot: i32,
        duration: f32,
        retriggerable: bool,
        f: F,
    ) -> i32
    where
        F: FnMut(&mut World) + Send + Sync + 'static,
    {
        let Some(world) = self.preferred_world() else {
            warn!("No play or editor world available, delayed call not registered");
            return INVALID_SLOT;
        };
        schedule::schedule_callable(world, slot, duration, retriggerable, f)
    }

    /// [`schedule::schedule_raw`] on the preferred world.
    pub fn schedule_raw<C, F, A>(
        &mut self,
        target: &Arc<Mutex<C>>,
        slot: i32,
        duration: f32,
        retriggerable: bool,
        method: F,
        args: A,
    ) -> i32
    where
        C: Send + 'static,
        F: FnMut(&mut C, A) + Send + Sync + 'static,
        A: Clone + Send + Sync + 'static,
    {
        let Some(world) = self.preferred_world() else {
            warn!("No play or editor world available, delayed call not registered");
            return INVALID_SLOT;
        };
        schedule::schedule_raw(world, target, slot, duration, retriggerable, method, args)
    }

    /// [`schedule::schedule_by_name`] on the world that contains `target`.
    pub fn schedule_by_name(
        &mut self,
        target: Entity,
        slot: i32,
        function: impl Into<String>,
        duration: f32,
        retriggerable: bool,
    ) -> i32 {
        let Some(world) = self.world_of(target) else {
            warn!(
                "No world contains entity {:?}, delayed call not registered",
                target
            );
            return INVALID_SLOT;
        };
        schedule::schedule_by_name(world, target, slot, function, duration, retriggerable)
    }

    /// [`schedule::run_on_tick`] on the preferred world.
    pub fn run_on_tick<F>(&mut self, f: F) -> i32
    where
        F: FnMut(&mut World, f32) -> bool + Send + Sync + 'static,
    {
        let Some(world) = self.preferred_world() else {
            warn!("No play or editor world available, per-tick call not registered");
            return INVALID_SLOT;
        };
        schedule::run_on_tick(world, f)
    }
}
