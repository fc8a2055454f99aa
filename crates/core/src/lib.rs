#![deny(unsafe_code)]
//! Core types and traits for the flipfield particle system.
//!
//! Provides the `Particle`/`Regime`/`ParticleStore` data model, the `Engine`
//! trait, the cancellable tick `Scheduler`, the `Xorshift64` spawn PRNG,
//! `RunSpec`, and the JSON parameter helpers shared by every engine crate.

pub mod engine;
pub mod error;
pub mod params;
pub mod particle;
pub mod prng;
pub mod run;
pub mod scheduler;

pub use engine::Engine;
pub use error::EngineError;
pub use particle::{Census, Particle, ParticleStore, Regime, DEFAULT_BOUNDARY_RADIUS};
pub use prng::Xorshift64;
pub use run::RunSpec;
pub use scheduler::{CancelHandle, Control, RunSummary, Scheduler, StopReason};
