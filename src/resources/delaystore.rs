//! Per-world registry of pending delay actions.
//!
//! Actions are keyed by `(OwnerKey, slot)` and laid out as one small list per
//! owner, since most owners hold only a handful of pending calls at a time.
//! The store enforces nothing by itself beyond storage; the scheduling entry
//! points in [`crate::schedule`] implement the find-or-retrigger policy and
//! guarantee at most one live action per key.

use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::actions::delaycall::DelayCall;

/// Sentinel slot id: let the store pick a fresh one.
pub const AUTO_SLOT: i32 = -1;

/// Returned by the scheduling entry points when nothing was registered.
pub const INVALID_SLOT: i32 = -1;

/// Identity under which an action is registered; scopes the slot namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerKey {
    /// Owned by the world itself: free callables, raw targets, per-tick
    /// functors. Lives until the world is dropped.
    World,
    /// Owned by an entity; despawning the entity cancels all of its actions
    /// without firing them.
    Entity(Entity),
}

struct SlotEntry {
    slot: i32,
    call: DelayCall,
}

/// All pending delay actions of one world.
#[derive(Resource)]
pub struct DelayStore {
    actions: FxHashMap<OwnerKey, SmallVec<[SlotEntry; 4]>>,
    next_slot: i32,
}

impl Default for DelayStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayStore {
    /// Create an empty store.
    pub fn new() -> Self {
        DelayStore {
            actions: FxHashMap::default(),
            next_slot: 0,
        }
    }

    /// The live action under `(owner, slot)`, if any.
    pub fn find_existing(&mut self, owner: OwnerKey, slot: i32) -> Option<&mut DelayCall> {
        self.actions
            .get_mut(&owner)?
            .iter_mut()
            .find(|entry| entry.slot == slot)
            .map(|entry| &mut entry.call)
    }

    /// Whether an action is pending under `(owner, slot)`.
    pub fn contains(&self, owner: OwnerKey, slot: i32) -> bool {
        self.actions
            .get(&owner)
            .is_some_and(|list| list.iter().any(|entry| entry.slot == slot))
    }

    /// Store `call` under `(owner, slot)`. The key must be free; callers go
    /// through [`find_existing`](Self::find_existing) first.
    pub fn add(&mut self, owner: OwnerKey, slot: i32, call: DelayCall) {
        self.actions
            .entry(owner)
            .or_default()
            .push(SlotEntry { slot, call });
    }

    /// Remove and return the action under `(owner, slot)`, if any.
    pub fn take(&mut self, owner: OwnerKey, slot: i32) -> Option<DelayCall> {
        let list = self.actions.get_mut(&owner)?;
        let index = list.iter().position(|entry| entry.slot == slot)?;
        let entry = list.swap_remove(index);
        if list.is_empty() {
            self.actions.remove(&owner);
        }
        Some(entry.call)
    }

    /// Drop every action registered under `owner`, returning how many there
    /// were. Used when an owner is torn down; the actions never fire.
    pub fn discard_owner(&mut self, owner: OwnerKey) -> usize {
        self.actions.remove(&owner).map_or(0, |list| list.len())
    }

    /// A slot id guaranteed not to collide with any live key of `owner`.
    /// Ids come from a store-wide monotonic counter and skip both the
    /// sentinel and any value a caller already registered directly.
    pub fn unique_slot(&mut self, owner: OwnerKey) -> i32 {
        loop {
            let candidate = self.next_slot;
            self.next_slot = self.next_slot.wrapping_add(1);
            if candidate == AUTO_SLOT {
                continue;
            }
            if !self.contains(owner, candidate) {
                return candidate;
            }
        }
    }

    /// Snapshot of the owners that currently hold pending actions.
    pub fn owners(&self) -> Vec<OwnerKey> {
        self.actions.keys().copied().collect()
    }

    /// Snapshot of the slots pending under `owner`.
    pub fn slots_for(&self, owner: OwnerKey) -> Vec<i32> {
        self.actions
            .get(&owner)
            .map(|list| list.iter().map(|entry| entry.slot).collect())
            .unwrap_or_default()
    }

    /// Total number of pending actions across all owners.
    pub fn len(&self) -> usize {
        self.actions.values().map(|list| list.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
