//! Deferred call scheduling for `bevy_ecs` worlds.
//!
//! This library lets arbitrary callables (closures, entity-bound methods,
//! methods on plain shared objects, and name-resolved callbacks) be invoked
//! after a countdown, optionally re-triggered or repeating, with per-call
//! identity and at-most-one-pending-action-per-key semantics.
//!
//! - [`actions`] – bound invocations and the countdown state machine
//! - [`resources`] – per-world stores: pending actions, callbacks, time
//! - [`schedule`] – the public scheduling entry points
//! - [`systems`] – the per-frame time and delivery systems
//! - [`worlds`] – a multi-world container with play/editor resolution

pub mod actions;
pub mod resources;
pub mod schedule;
pub mod systems;
pub mod worlds;
