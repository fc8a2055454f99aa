#![deny(unsafe_code)]
//! Analytic reference curves plotted next to the live particle field.
//!
//! Over an evenly spaced radial grid the sampler evaluates
//!
//! - the orientation function `F(r) = (r - Rs) / k`, which is zero at the
//!   boundary, positive outside it, and negative inside;
//! - the divergence `S(r) = min(cap, 1 / (|F(r)| + ε))`, which grows toward
//!   the boundary and is clamped for display.
//!
//! Grid points within the exclusion band around `Rs` are skipped so the
//! spike at the boundary does not dominate a chart's scale.

use flipfield_core::error::{require_finite, require_non_negative, require_positive};
use flipfield_core::params::{number_schema, param_f64};
use flipfield_core::{EngineError, DEFAULT_BOUNDARY_RADIUS};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::iter::FusedIterator;

const DEFAULT_SCALE: f64 = 50.0;
const DEFAULT_DIVERGENCE_CAP: f64 = 10.0;
const DEFAULT_DIVERGENCE_EPSILON: f64 = 0.001;
const DEFAULT_EXCLUSION_HALF_WIDTH: f64 = 2.0;
const DEFAULT_SAMPLE_STEP: f64 = 2.0;
const DEFAULT_SAMPLE_START: f64 = 1.0;
const DEFAULT_DOMAIN_MAX: f64 = 200.0;

/// Slack when counting grid points, so `(199 - 1) / 2` is not lost to rounding.
const GRID_SLACK: f64 = 1e-9;

/// Largest grid `validate` accepts.
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// Constants for the analytic curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParams {
    /// Boundary radius `Rs` where the orientation crosses zero.
    pub boundary_radius: f64,
    /// Scale `k` in `F(r) = (r - Rs) / k`.
    pub scale: f64,
    /// Upper clamp on the divergence.
    pub divergence_cap: f64,
    /// `ε` added to `|F|` before inversion.
    pub divergence_epsilon: f64,
    /// Grid points with `|r - Rs| < exclusion_half_width` are skipped.
    pub exclusion_half_width: f64,
    /// Grid spacing `Δ`.
    pub sample_step: f64,
    /// First grid point.
    pub sample_start: f64,
    /// Domain maximum `D`; the last grid point is the largest `start + iΔ ≤ D`.
    pub domain_max: f64,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            boundary_radius: DEFAULT_BOUNDARY_RADIUS,
            scale: DEFAULT_SCALE,
            divergence_cap: DEFAULT_DIVERGENCE_CAP,
            divergence_epsilon: DEFAULT_DIVERGENCE_EPSILON,
            exclusion_half_width: DEFAULT_EXCLUSION_HALF_WIDTH,
            sample_step: DEFAULT_SAMPLE_STEP,
            sample_start: DEFAULT_SAMPLE_START,
            domain_max: DEFAULT_DOMAIN_MAX,
        }
    }
}

impl CurveParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    ///
    /// Shares the `boundary_radius` key with the dynamics parameters, so one
    /// JSON object can configure both.
    pub fn from_json(params: &Value) -> Self {
        Self {
            boundary_radius: param_f64(params, "boundary_radius", DEFAULT_BOUNDARY_RADIUS),
            scale: param_f64(params, "scale", DEFAULT_SCALE),
            divergence_cap: param_f64(params, "divergence_cap", DEFAULT_DIVERGENCE_CAP),
            divergence_epsilon: param_f64(
                params,
                "divergence_epsilon",
                DEFAULT_DIVERGENCE_EPSILON,
            ),
            exclusion_half_width: param_f64(
                params,
                "exclusion_half_width",
                DEFAULT_EXCLUSION_HALF_WIDTH,
            ),
            sample_step: param_f64(params, "sample_step", DEFAULT_SAMPLE_STEP),
            sample_start: param_f64(params, "sample_start", DEFAULT_SAMPLE_START),
            domain_max: param_f64(params, "domain_max", DEFAULT_DOMAIN_MAX),
        }
    }

    /// Rejects constants that would produce a non-finite or unbounded curve.
    pub fn validate(&self) -> Result<(), EngineError> {
        require_finite("boundary_radius", self.boundary_radius)?;
        require_positive("scale", self.scale)?;
        require_non_negative("divergence_cap", self.divergence_cap)?;
        require_positive("divergence_epsilon", self.divergence_epsilon)?;
        require_non_negative("exclusion_half_width", self.exclusion_half_width)?;
        require_positive("sample_step", self.sample_step)?;
        require_finite("sample_start", self.sample_start)?;
        require_finite("domain_max", self.domain_max)?;
        if self.grid_points() > MAX_GRID_POINTS as f64 {
            return Err(EngineError::invalid_param(
                "sample_step",
                format!("grid would exceed {MAX_GRID_POINTS} points"),
            ));
        }
        Ok(())
    }

    /// Current values as a JSON object.
    pub fn to_json(&self) -> Value {
        json!({
            "boundary_radius": self.boundary_radius,
            "scale": self.scale,
            "divergence_cap": self.divergence_cap,
            "divergence_epsilon": self.divergence_epsilon,
            "exclusion_half_width": self.exclusion_half_width,
            "sample_step": self.sample_step,
            "sample_start": self.sample_start,
            "domain_max": self.domain_max,
        })
    }

    /// Schema for every curve parameter.
    pub fn schema() -> Value {
        json!({
            "boundary_radius": number_schema(DEFAULT_BOUNDARY_RADIUS, 1.0, 1000.0,
                "Radius Rs where the orientation function crosses zero"),
            "scale": number_schema(DEFAULT_SCALE, 0.01, 1000.0,
                "Scale k in F(r) = (r - Rs) / k"),
            "divergence_cap": number_schema(DEFAULT_DIVERGENCE_CAP, 0.0, 1000.0,
                "Upper clamp on the divergence S(r)"),
            "divergence_epsilon": number_schema(DEFAULT_DIVERGENCE_EPSILON, 1e-9, 1.0,
                "Offset added to |F(r)| before inversion"),
            "exclusion_half_width": number_schema(DEFAULT_EXCLUSION_HALF_WIDTH, 0.0, 100.0,
                "Samples with |r - Rs| below this are skipped"),
            "sample_step": number_schema(DEFAULT_SAMPLE_STEP, 0.01, 100.0,
                "Grid spacing between samples"),
            "sample_start": number_schema(DEFAULT_SAMPLE_START, 0.0, 1000.0,
                "First grid radius"),
            "domain_max": number_schema(DEFAULT_DOMAIN_MAX, 0.0, 5000.0,
                "Largest radius the grid may reach"),
        })
    }

    /// Number of grid points before the exclusion band is applied.
    ///
    /// Saturates at `usize::MAX` for grids too fine to count.
    pub fn grid_len(&self) -> usize {
        let points = self.grid_points();
        if points >= usize::MAX as f64 {
            usize::MAX
        } else {
            points as usize
        }
    }

    fn grid_points(&self) -> f64 {
        let span = self.domain_max - self.sample_start;
        if !(self.sample_step > 0.0) || !span.is_finite() || span < 0.0 {
            return 0.0;
        }
        (span / self.sample_step + GRID_SLACK).floor() + 1.0
    }

    /// `F(r) = (r - Rs) / k`.
    pub fn orientation_at(&self, radius: f64) -> f64 {
        (radius - self.boundary_radius) / self.scale
    }

    /// `S = min(cap, 1 / (|F| + ε))`.
    pub fn divergence_of(&self, orientation: f64) -> f64 {
        (1.0 / (orientation.abs() + self.divergence_epsilon)).min(self.divergence_cap)
    }

    /// True when `radius` falls inside the band skipped around the boundary.
    pub fn is_excluded(&self, radius: f64) -> bool {
        (radius - self.boundary_radius).abs() < self.exclusion_half_width
    }
}

/// Sign of the orientation function: which side of the boundary a radius is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// `F > 0`: outside the boundary.
    Normal,
    /// `F < 0`: inside the boundary.
    Flipped,
    /// `F = 0`: exactly on the boundary, where orientation is not defined.
    Undefined,
}

impl Orientation {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Orientation::Normal
        } else if value < 0.0 {
            Orientation::Flipped
        } else {
            Orientation::Undefined
        }
    }

    /// `+1`, `-1`, or `0`.
    pub fn signum(self) -> i8 {
        match self {
            Orientation::Normal => 1,
            Orientation::Flipped => -1,
            Orientation::Undefined => 0,
        }
    }
}

/// One point of the reference curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyticSample {
    pub radius: f64,
    pub orientation: f64,
    pub divergence: f64,
}

impl AnalyticSample {
    pub fn orientation_sign(&self) -> Orientation {
        Orientation::of(self.orientation)
    }
}

/// Lazy sequence of [`AnalyticSample`]s in increasing radius order.
///
/// Cloning the iterator restarts from the clone point; calling
/// [`sample_curve`] again restarts from the beginning.
#[derive(Debug, Clone)]
pub struct CurveSamples {
    params: CurveParams,
    next_index: usize,
    grid_len: usize,
}

impl Iterator for CurveSamples {
    type Item = AnalyticSample;

    fn next(&mut self) -> Option<AnalyticSample> {
        while self.next_index < self.grid_len {
            // index arithmetic keeps the grid free of accumulated rounding
            let radius =
                self.params.sample_start + self.next_index as f64 * self.params.sample_step;
            self.next_index += 1;
            if self.params.is_excluded(radius) {
                continue;
            }
            let orientation = self.params.orientation_at(radius);
            return Some(AnalyticSample {
                radius,
                orientation,
                divergence: self.params.divergence_of(orientation),
            });
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.grid_len - self.next_index))
    }
}

impl FusedIterator for CurveSamples {}

/// Samples the orientation and divergence curves over `[sample_start, domain_max]`.
///
/// Pure and uncached: every call produces a fresh sequence from the
/// constants alone.
pub fn sample_curve(params: &CurveParams) -> CurveSamples {
    CurveSamples {
        params: *params,
        next_index: 0,
        grid_len: params.grid_len(),
    }
}
