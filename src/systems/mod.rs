//! Per-frame systems.
//!
//! The host application runs these once per frame, in order: first the time
//! update, then delivery.
//!
//! Submodules overview
//! - [`dispatch`] – sweep dead owners, tick pending actions, remove finished ones
//! - [`time`] – update simulation time and delta

pub mod dispatch;
pub mod time;
