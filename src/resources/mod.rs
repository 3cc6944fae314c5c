//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into each world that
//! wants deferred calls. Each submodule documents the semantics and intended
//! usage of its resource.
//!
//! Overview
//! - `callbackstore` – registry of name-addressable callbacks for late-bound calls
//! - `delaystore` – pending delay actions keyed by (owner, slot)
//! - `democonfig` – demo executable settings loaded from an INI file
//! - `worldtime` – simulation time and delta

pub mod callbackstore;
pub mod delaystore;
pub mod democonfig;
pub mod worldtime;
