#![deny(unsafe_code)]
//! Read-only consumers of the flipfield state: raster snapshots of the
//! particle field and text export of the analytic curves.
//!
//! Nothing here mutates a [`ParticleStore`](flipfield_core::ParticleStore);
//! frames are drawn from the snapshot handed over between ticks.

pub mod export;
pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::{render_frame, Frame, Rgb, Style, Viewport};
