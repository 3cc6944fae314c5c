//! Delay action building blocks.
//!
//! Submodules overview
//! - [`delaycall`] – countdown state machine that fires a bound invocation
//! - [`invocation`] – type-erased callable plus its captured arguments

pub mod delaycall;
pub mod invocation;
