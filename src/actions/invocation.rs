//! Type-erased bound invocations.
//!
//! A [`BoundInvocation`] stores one callable together with everything it needs
//! to run later (a snapshot of its arguments and a handle to its target) and
//! exposes the single capability [`invoke`](BoundInvocation::invoke), whose
//! `bool` result is the callable's own "I am complete" report.
//!
//! Four binding variants are supported:
//!
//! - [`BoundInvocation::callable`] – any closure over the world
//! - [`BoundInvocation::member`] – a method-style call on a live [`Entity`]
//! - [`BoundInvocation::raw`] – a method-style call on a plain shared object
//!   outside the ECS, held weakly so no ownership is taken
//! - [`BoundInvocation::by_name`] – dispatch through the world's
//!   [`CallbackStore`](crate::resources::callbackstore::CallbackStore),
//!   resolved at fire time rather than at registration time
//!
//! Arguments are captured once at construction and never mutated afterwards;
//! each invocation receives a fresh clone of the snapshot.

use std::sync::{Arc, Mutex};

use bevy_ecs::prelude::*;
use log::{error, warn};

use crate::resources::callbackstore::CallbackStore;

/// Why an invocation could not run its callable.
///
/// Both conditions are logged at the failure site; the countdown layer treats
/// them as unconditional completion so a dead binding is retired instead of
/// retried forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeError {
    /// The bound target no longer exists (despawned entity or dropped object).
    TargetGone,
    /// No callback is registered under the bound name.
    UnresolvedName,
}

enum CellKind {
    Callable(Box<dyn FnMut(&mut World) -> bool + Send + Sync>),
    EntityMethod {
        target: Entity,
        call: Box<dyn FnMut(&mut World, Entity) -> bool + Send + Sync>,
    },
    Named {
        target: Entity,
        function: String,
    },
    RawMethod {
        alive: Box<dyn Fn() -> bool + Send + Sync>,
        // None when the target has been dropped.
        call: Box<dyn FnMut() -> Option<bool> + Send + Sync>,
    },
}

/// One callable bound to its target and argument snapshot.
pub struct BoundInvocation {
    kind: CellKind,
}

impl BoundInvocation {
    /// Bind a free callable. The closure environment carries any captured
    /// state; the returned bool is the completion report.
    pub fn callable<F>(f: F) -> Self
    where
        F: FnMut(&mut World) -> bool + Send + Sync + 'static,
    {
        BoundInvocation {
            kind: CellKind::Callable(Box::new(f)),
        }
    }

    /// Bind a method-style callable to a live entity. `args` is snapshotted
    /// here and cloned into every invocation. The entity is checked for
    /// liveness each time before the method runs.
    pub fn member<F, A>(target: Entity, mut method: F, args: A) -> Self
    where
        F: FnMut(&mut World, Entity, A) -> bool + Send + Sync + 'static,
        A: Clone + Send + Sync + 'static,
    {
        let call = Box::new(move |world: &mut World, entity: Entity| {
            method(world, entity, args.clone())
        });
        BoundInvocation {
            kind: CellKind::EntityMethod { target, call },
        }
    }

    /// Bind a method-style callable to a plain shared object. Only a weak
    /// handle is stored, so scheduling never extends the target's lifetime;
    /// the caller keeps the [`Arc`] alive for as long as the call should be
    /// able to fire. A poisoned lock is recovered, not propagated.
    pub fn raw<C, F, A>(target: &Arc<Mutex<C>>, mut method: F, args: A) -> Self
    where
        C: Send + 'static,
        F: FnMut(&mut C, A) -> bool + Send + Sync + 'static,
        A: Clone + Send + Sync + 'static,
    {
        let alive_handle = Arc::downgrade(target);
        let call_handle = Arc::downgrade(target);
        let alive = Box::new(move || alive_handle.strong_count() > 0);
        let call = Box::new(move || {
            let shared = call_handle.upgrade()?;
            let mut guard = match shared.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            Some(method(&mut guard, args.clone()))
        });
        BoundInvocation {
            kind: CellKind::RawMethod { alive, call },
        }
    }

    /// Bind a call by callback name on a live entity. The name is resolved
    /// against the world's [`CallbackStore`] at fire time, so a callback may
    /// be registered after the invocation is scheduled.
    pub fn by_name(target: Entity, function: impl Into<String>) -> Self {
        BoundInvocation {
            kind: CellKind::Named {
                target,
                function: function.into(),
            },
        }
    }

    /// Run the bound callable once. `Ok(true)` means the callable reports
    /// itself complete. Errors are logged here and mean the callable did not
    /// run at all.
    pub fn invoke(&mut self, world: &mut World) -> Result<bool, InvokeError> {
        match &mut self.kind {
            CellKind::Callable(call) => Ok(call(world)),
            CellKind::EntityMethod { target, call } => {
                if world.get_entity(*target).is_err() {
                    warn!(
                        "Delayed call target {:?} is gone, nothing to execute",
                        target
                    );
                    return Err(InvokeError::TargetGone);
                }
                Ok(call(world, *target))
            }
            CellKind::Named { target, function } => {
                if world.get_entity(*target).is_err() {
                    warn!(
                        "Delayed call target {:?} is gone, dropping the call to '{}'",
                        target, function
                    );
                    return Err(InvokeError::TargetGone);
                }
                let Some(store) = world.get_resource::<CallbackStore>() else {
                    error!(
                        "World has no CallbackStore, cannot resolve callback '{}'",
                        function
                    );
                    return Err(InvokeError::UnresolvedName);
                };
                let Some(id) = store.get(function.as_str()).copied() else {
                    error!("No callback registered under '{}'", function);
                    return Err(InvokeError::UnresolvedName);
                };
                match world.run_system_with(id, *target) {
                    Ok(done) => Ok(done),
                    Err(e) => {
                        error!("Callback '{}' failed to run: {:?}", function, e);
                        Err(InvokeError::UnresolvedName)
                    }
                }
            }
            CellKind::RawMethod { alive: _, call } => match call() {
                Some(done) => Ok(done),
                None => {
                    warn!("Delayed call target is gone, nothing to execute");
                    Err(InvokeError::TargetGone)
                }
            },
        }
    }

    /// Whether the invocation still has a live target. Free callables are
    /// always bound.
    pub fn is_bound(&self, world: &World) -> bool {
        match &self.kind {
            CellKind::Callable(_) => true,
            CellKind::EntityMethod { target, .. } | CellKind::Named { target, .. } => {
                world.get_entity(*target).is_ok()
            }
            CellKind::RawMethod { alive, .. } => alive(),
        }
    }
}
