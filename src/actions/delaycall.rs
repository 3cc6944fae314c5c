//! Countdown state machine for deferred calls.
//!
//! A [`DelayCall`] owns a [`BoundInvocation`] and counts scaled seconds down
//! to zero, at which point the invocation fires. Three shapes exist:
//!
//! - [`DelayCall::once`] – fires a single time when the countdown crosses
//!   zero, whatever the invocation reports
//! - [`DelayCall::repeating`] – after firing, rearms the countdown while the
//!   invocation keeps reporting "not done", carrying overshoot over so the
//!   cadence does not drift
//! - [`DelayCall::per_tick`] – no countdown at all; the functor runs every
//!   tick with the frame delta until it reports done
//!
//! A duration of zero means "fire on the very next tick": the first `tick`
//! fires unconditionally, even when the elapsed sample is itself zero, and
//! the action always completes after that firing.

use bevy_ecs::prelude::*;

use crate::actions::invocation::BoundInvocation;

/// Durations below this many seconds are treated as "fire on the next tick".
pub const NEXT_TICK_EPSILON: f32 = 1e-4;

enum CallKind {
    Countdown {
        remaining: f32,
        initial: f32,
        repeat: bool,
        cell: BoundInvocation,
    },
    PerTick(Box<dyn FnMut(&mut World, f32) -> bool + Send + Sync>),
}

/// One scheduled action: a bound invocation behind a countdown.
pub struct DelayCall {
    kind: CallKind,
}

impl DelayCall {
    /// Fire `cell` once, `duration` scaled seconds from now.
    pub fn once(duration: f32, cell: BoundInvocation) -> Self {
        DelayCall {
            kind: CallKind::Countdown {
                remaining: duration,
                initial: duration,
                repeat: false,
                cell,
            },
        }
    }

    /// Fire `cell` every `duration` scaled seconds until it reports done.
    pub fn repeating(duration: f32, cell: BoundInvocation) -> Self {
        DelayCall {
            kind: CallKind::Countdown {
                remaining: duration,
                initial: duration,
                repeat: true,
                cell,
            },
        }
    }

    /// Run `f` on every tick with the frame delta until it reports done.
    pub fn per_tick<F>(f: F) -> Self
    where
        F: FnMut(&mut World, f32) -> bool + Send + Sync + 'static,
    {
        DelayCall {
            kind: CallKind::PerTick(Box::new(f)),
        }
    }

    /// Advance the countdown by `elapsed` seconds and fire when it crosses
    /// zero. Returns true when the action is finished and should be removed.
    ///
    /// Invocation errors have already been logged by the cell and count as
    /// completion, so a dead binding is retired rather than retried forever.
    pub fn tick(&mut self, world: &mut World, elapsed: f32) -> bool {
        match &mut self.kind {
            CallKind::PerTick(f) => f(world, elapsed),
            CallKind::Countdown {
                remaining,
                initial,
                repeat,
                cell,
            } => {
                *remaining -= elapsed;
                if *remaining > 0.0 {
                    return false;
                }
                let mut done = match cell.invoke(world) {
                    Ok(finished) => finished || !*repeat,
                    Err(_) => true,
                };
                if !done {
                    // Overshoot past the deadline is carried into the next
                    // round so the average cadence stays at `initial`.
                    *remaining += *initial;
                }
                if *initial < NEXT_TICK_EPSILON {
                    done = true;
                }
                done
            }
        }
    }

    /// Restart the countdown with a new duration. The bound invocation and
    /// the rearm cadence keep their original values. No-op for per-tick
    /// actions.
    pub fn set_duration(&mut self, duration: f32) {
        if let CallKind::Countdown { remaining, .. } = &mut self.kind {
            *remaining = duration;
        }
    }

    /// Seconds left before the next firing, or `None` for per-tick actions.
    pub fn remaining(&self) -> Option<f32> {
        match &self.kind {
            CallKind::Countdown { remaining, .. } => Some(*remaining),
            CallKind::PerTick(_) => None,
        }
    }

    /// The duration the action was constructed with, or `None` for per-tick
    /// actions.
    pub fn duration(&self) -> Option<f32> {
        match &self.kind {
            CallKind::Countdown { initial, .. } => Some(*initial),
            CallKind::PerTick(_) => None,
        }
    }

    /// Whether a zero duration makes this action fire on the very next tick.
    pub fn is_next_tick(&self) -> bool {
        match &self.kind {
            CallKind::Countdown { initial, .. } => *initial < NEXT_TICK_EPSILON,
            CallKind::PerTick(_) => false,
        }
    }
}
