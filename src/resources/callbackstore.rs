//! Registry for name-addressable callbacks.
//!
//! Allows one-shot systems to be registered under string keys and looked up
//! later to run via their [`bevy_ecs::system::SystemId`]. Delayed calls bound
//! by name resolve against this table at fire time, so registration order
//! does not matter as long as the name exists by the time the call fires.

use bevy_ecs::prelude::{Entity, In, Resource};
use bevy_ecs::system::SystemId;
use rustc_hash::FxHashMap;

/// Id of a registered callback: takes the target entity, reports completion.
pub type CallbackId = SystemId<In<Entity>, bool>;

/// Map of callback names to system IDs.
#[derive(Resource)]
pub struct CallbackStore {
    pub map: FxHashMap<String, CallbackId>,
}

impl Default for CallbackStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CallbackStore {
    /// Create an empty store.
    pub fn new() -> Self {
        CallbackStore {
            map: FxHashMap::default(),
        }
    }

    /// Insert a callback ID under a human-readable name. A name already in
    /// use is rebound to the new callback.
    pub fn insert(&mut self, name: impl Into<String>, id: CallbackId) {
        self.map.insert(name.into(), id);
    }

    /// Retrieve a callback ID by name, if present.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&CallbackId> {
        self.map.get(name.as_ref())
    }

    /// Whether a callback is registered under `name`.
    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.map.contains_key(name.as_ref())
    }

    /// Remove a callback by name, returning its ID if it existed.
    pub fn remove(&mut self, name: impl AsRef<str>) -> Option<CallbackId> {
        self.map.remove(name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
