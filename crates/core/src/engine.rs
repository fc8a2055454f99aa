//! The `Engine` trait driven by the [`Scheduler`](crate::scheduler::Scheduler).
//!
//! The trait is object-safe so a scheduler or CLI can hold a `dyn Engine`.

use crate::particle::ParticleStore;
use serde_json::Value;

/// A tick-based particle simulation.
///
/// One call to [`step`](Engine::step) is one tick. Stepping is infallible:
/// every rule in a particle engine is defined for any finite state, so there
/// is nothing for the caller to recover from.
pub trait Engine {
    /// Advance every particle by exactly one tick.
    fn step(&mut self);

    /// Snapshot of the particles after the most recent tick.
    fn particles(&self) -> &ParticleStore;

    /// Number of ticks applied since construction.
    fn tick(&self) -> u64;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing every parameter: type, default, range, description.
    fn param_schema(&self) -> Value;
}
