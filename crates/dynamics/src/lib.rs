#![deny(unsafe_code)]
//! Boundary-flip particle dynamics.
//!
//! Particles live in polar coordinates around a domain center and drift
//! inward. Outside the boundary radius `Rs` they are pulled by a clamped
//! `1/distance` attractor and their speed saturates at a cap. The first tick
//! that carries a particle to or past `Rs` snaps it just inside the boundary
//! and flips its regime. Flipped particles sink at a constant rate and are
//! recycled at the respawn radius once they pass the center.
//!
//! Every tick builds a new [`ParticleStore`]; the previous snapshot is never
//! mutated.

use flipfield_core::error::{require_finite, require_non_negative, require_positive};
use flipfield_core::params::{integer_schema, number_schema, param_f64, param_usize};
use flipfield_core::{
    Engine, EngineError, Particle, ParticleStore, Regime, Xorshift64, DEFAULT_BOUNDARY_RADIUS,
};
use serde_json::{json, Value};

/// Default respawn radius: the center of a 600-unit display domain.
const DEFAULT_RESPAWN_RADIUS: f64 = 300.0;
/// Default attraction strength `A`.
const DEFAULT_ATTRACTION: f64 = 20.0;
/// Default scaling applied to the attraction before it is added to speed.
const DEFAULT_DT_COEFFICIENT: f64 = 0.1;
/// Default velocity cap for the `Normal` regime.
const DEFAULT_SPEED_CAP: f64 = 5.0;
/// Default offset inside the boundary where crossing particles are placed.
const DEFAULT_SNAP_OFFSET: f64 = 1.0;
/// Default per-tick radius decrement in the `Flipped` regime.
const DEFAULT_FLIPPED_DECREMENT: f64 = 0.5;
/// Default speed assigned at spawn and restored at respawn.
const DEFAULT_BASELINE_SPEED: f64 = 0.5;
/// Default width of the extra uniform speed added at spawn.
const DEFAULT_SPEED_JITTER: f64 = 0.0;
/// Default particle count.
const DEFAULT_POPULATION: usize = 150;
/// Default inner edge of the spawn band.
const DEFAULT_SPAWN_MIN: f64 = 150.0;
/// Default outer edge of the spawn band.
const DEFAULT_SPAWN_MAX: f64 = 350.0;

/// Constants for the flip dynamics, fixed at construction.
///
/// [`Default`] gives the reference configuration: `Rs = 100`, `A = 20`,
/// cap 5, snap offset 1, flipped decrement 0.5, 150 particles spawned in
/// `[150, 350)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipParams {
    /// Boundary radius `Rs` where the regime flips.
    pub boundary_radius: f64,
    /// Radius (domain center value) where recycled particles reappear.
    pub respawn_radius: f64,
    /// Attraction strength `A`.
    pub attraction: f64,
    /// Multiplier on the attraction before it is added to speed.
    pub dt_coefficient: f64,
    /// Upper bound on `Normal`-regime speed.
    pub speed_cap: f64,
    /// Crossing particles are placed at `Rs - snap_offset`.
    pub snap_offset: f64,
    /// Constant inward step in the `Flipped` regime.
    pub flipped_decrement: f64,
    /// Speed at spawn; restored on respawn.
    pub baseline_speed: f64,
    /// Each particle's spawn speed is `baseline_speed + U[0, speed_jitter)`.
    pub speed_jitter: f64,
    pub population: usize,
    /// Inner edge of the spawn band.
    pub spawn_min: f64,
    /// Outer edge of the spawn band.
    pub spawn_max: f64,
}

impl Default for FlipParams {
    fn default() -> Self {
        Self {
            boundary_radius: DEFAULT_BOUNDARY_RADIUS,
            respawn_radius: DEFAULT_RESPAWN_RADIUS,
            attraction: DEFAULT_ATTRACTION,
            dt_coefficient: DEFAULT_DT_COEFFICIENT,
            speed_cap: DEFAULT_SPEED_CAP,
            snap_offset: DEFAULT_SNAP_OFFSET,
            flipped_decrement: DEFAULT_FLIPPED_DECREMENT,
            baseline_speed: DEFAULT_BASELINE_SPEED,
            speed_jitter: DEFAULT_SPEED_JITTER,
            population: DEFAULT_POPULATION,
            spawn_min: DEFAULT_SPAWN_MIN,
            spawn_max: DEFAULT_SPAWN_MAX,
        }
    }
}

impl FlipParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            boundary_radius: param_f64(params, "boundary_radius", DEFAULT_BOUNDARY_RADIUS),
            respawn_radius: param_f64(params, "respawn_radius", DEFAULT_RESPAWN_RADIUS),
            attraction: param_f64(params, "attraction", DEFAULT_ATTRACTION),
            dt_coefficient: param_f64(params, "dt_coefficient", DEFAULT_DT_COEFFICIENT),
            speed_cap: param_f64(params, "speed_cap", DEFAULT_SPEED_CAP),
            snap_offset: param_f64(params, "snap_offset", DEFAULT_SNAP_OFFSET),
            flipped_decrement: param_f64(params, "flipped_decrement", DEFAULT_FLIPPED_DECREMENT),
            baseline_speed: param_f64(params, "baseline_speed", DEFAULT_BASELINE_SPEED),
            speed_jitter: param_f64(params, "speed_jitter", DEFAULT_SPEED_JITTER),
            population: param_usize(params, "population", DEFAULT_POPULATION),
            spawn_min: param_f64(params, "spawn_min", DEFAULT_SPAWN_MIN),
            spawn_max: param_f64(params, "spawn_max", DEFAULT_SPAWN_MAX),
        }
    }

    /// Rejects configurations the dynamics cannot run sensibly.
    ///
    /// The spawn band must be finite, ordered, and lie outside the boundary.
    /// The cap, snap offset, and flipped decrement must be positive so that
    /// every particle keeps moving and eventually respawns, and the snap
    /// offset may not carry a crossing particle past the center.
    pub fn validate(&self) -> Result<(), EngineError> {
        require_positive("boundary_radius", self.boundary_radius)?;
        require_non_negative("respawn_radius", self.respawn_radius)?;
        require_non_negative("attraction", self.attraction)?;
        require_non_negative("dt_coefficient", self.dt_coefficient)?;
        require_positive("speed_cap", self.speed_cap)?;
        require_positive("snap_offset", self.snap_offset)?;
        require_positive("flipped_decrement", self.flipped_decrement)?;
        require_non_negative("baseline_speed", self.baseline_speed)?;
        require_non_negative("speed_jitter", self.speed_jitter)?;
        if self.snap_offset > self.boundary_radius {
            return Err(EngineError::invalid_param(
                "snap_offset",
                format!(
                    "must not exceed boundary_radius {}, got {}",
                    self.boundary_radius, self.snap_offset
                ),
            ));
        }

        if u32::try_from(self.population).is_err() {
            return Err(EngineError::invalid_param(
                "population",
                format!("at most {} particles, got {}", u32::MAX, self.population),
            ));
        }

        let band_err = |reason: &str| EngineError::InvalidBand {
            min: self.spawn_min,
            max: self.spawn_max,
            reason: reason.to_owned(),
        };
        require_finite("spawn_min", self.spawn_min).map_err(|_| band_err("non-finite edge"))?;
        require_finite("spawn_max", self.spawn_max).map_err(|_| band_err("non-finite edge"))?;
        if self.spawn_min > self.spawn_max {
            return Err(band_err("min exceeds max"));
        }
        if self.spawn_min <= self.boundary_radius {
            return Err(band_err("band must lie outside the boundary radius"));
        }
        Ok(())
    }
}

/// Builds the initial store.
///
/// Particle `i` gets id `i`, a radius uniform in `[spawn_min, spawn_max)`,
/// an angle uniform in `[0, 2π)`, speed `baseline_speed + U[0, speed_jitter)`,
/// and the `Normal` regime. Draw order per particle is radius, angle, speed,
/// so a seed fixes the whole field.
pub fn initialize(params: &FlipParams, rng: &mut Xorshift64) -> ParticleStore {
    let particles = (0..params.population)
        .map(|i| {
            let radius = rng.next_range(params.spawn_min, params.spawn_max);
            let angle = rng.next_angle();
            let speed = params.baseline_speed + rng.next_range(0.0, params.speed_jitter);
            Particle::new(i as u32, radius, angle, speed)
        })
        .collect();
    ParticleStore::new(particles)
}

/// Advances one particle by one tick.
pub fn step_particle(p: &Particle, params: &FlipParams) -> Particle {
    let mut next = *p;
    match p.regime {
        Regime::Normal => {
            let distance = p.radius - params.boundary_radius;
            let attraction = params.attraction / distance.abs().max(1.0);
            next.speed = (p.speed + attraction * params.dt_coefficient).min(params.speed_cap);
            next.radius = p.radius - next.speed;
            if next.radius <= params.boundary_radius {
                next.radius = params.boundary_radius - params.snap_offset;
                next.regime = Regime::Flipped;
            }
        }
        Regime::Flipped => {
            next.radius = p.radius - params.flipped_decrement;
            if next.radius < 0.0 {
                next.respawn(params.respawn_radius);
            }
        }
    }
    next
}

/// Advances every particle by one tick into a new store.
///
/// Particles never interact, so each is updated independently and exactly
/// once; ordering and length are preserved.
pub fn step(store: &ParticleStore, params: &FlipParams) -> ParticleStore {
    store.map(|p| step_particle(p, params))
}

/// Tick-driven engine owning the particle store.
pub struct FlipDynamics {
    store: ParticleStore,
    params: FlipParams,
    ticks: u64,
    crossings: u64,
    respawns: u64,
}

impl FlipDynamics {
    /// Validates `params` and spawns the initial field from `seed`.
    pub fn new(params: FlipParams, seed: u64) -> Result<Self, EngineError> {
        params.validate()?;
        let mut rng = Xorshift64::new(seed);
        let store = initialize(&params, &mut rng);
        log::debug!(
            "spawned {} particles in [{}, {}) with seed {seed}",
            store.len(),
            params.spawn_min,
            params.spawn_max
        );
        Ok(Self::from_store(store, params))
    }

    /// Creates an engine from a JSON params object (missing keys use defaults).
    pub fn from_json(json_params: &Value, seed: u64) -> Result<Self, EngineError> {
        Self::new(FlipParams::from_json(json_params), seed)
    }

    /// Wraps an existing store without validation or respawning.
    pub fn from_store(store: ParticleStore, params: FlipParams) -> Self {
        Self {
            store,
            params,
            ticks: 0,
            crossings: 0,
            respawns: 0,
        }
    }

    pub fn flip_params(&self) -> &FlipParams {
        &self.params
    }

    /// Total boundary crossings since construction.
    pub fn crossings(&self) -> u64 {
        self.crossings
    }

    /// Total respawns since construction.
    pub fn respawns(&self) -> u64 {
        self.respawns
    }
}

impl Engine for FlipDynamics {
    fn step(&mut self) {
        let next = step(&self.store, &self.params);

        let (mut crossed, mut respawned) = (0u64, 0u64);
        for (before, after) in self.store.iter().zip(next.iter()) {
            match (before.regime, after.regime) {
                (Regime::Normal, Regime::Flipped) => crossed += 1,
                (Regime::Flipped, Regime::Normal) => respawned += 1,
                _ => {}
            }
        }

        self.store = next;
        self.ticks += 1;
        self.crossings += crossed;
        self.respawns += respawned;

        if crossed > 0 || respawned > 0 {
            log::trace!(
                "tick {}: {crossed} crossed, {respawned} respawned",
                self.ticks
            );
        }
    }

    fn particles(&self) -> &ParticleStore {
        &self.store
    }

    fn tick(&self) -> u64 {
        self.ticks
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "boundary_radius": p.boundary_radius,
            "respawn_radius": p.respawn_radius,
            "attraction": p.attraction,
            "dt_coefficient": p.dt_coefficient,
            "speed_cap": p.speed_cap,
            "snap_offset": p.snap_offset,
            "flipped_decrement": p.flipped_decrement,
            "baseline_speed": p.baseline_speed,
            "speed_jitter": p.speed_jitter,
            "population": p.population,
            "spawn_min": p.spawn_min,
            "spawn_max": p.spawn_max,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "boundary_radius": number_schema(DEFAULT_BOUNDARY_RADIUS, 1.0, 1000.0,
                "Boundary radius Rs where particles flip regime"),
            "respawn_radius": number_schema(DEFAULT_RESPAWN_RADIUS, 0.0, 2000.0,
                "Radius where recycled particles reappear (domain center)"),
            "attraction": number_schema(DEFAULT_ATTRACTION, 0.0, 200.0,
                "Attraction strength A in A / max(1, |r - Rs|)"),
            "dt_coefficient": number_schema(DEFAULT_DT_COEFFICIENT, 0.0, 1.0,
                "Scale applied to the attraction before it is added to speed"),
            "speed_cap": number_schema(DEFAULT_SPEED_CAP, 0.01, 50.0,
                "Maximum inward speed in the normal regime"),
            "snap_offset": number_schema(DEFAULT_SNAP_OFFSET, 0.01, 50.0,
                "Distance inside Rs where crossing particles are placed"),
            "flipped_decrement": number_schema(DEFAULT_FLIPPED_DECREMENT, 0.01, 50.0,
                "Constant inward step per tick in the flipped regime"),
            "baseline_speed": number_schema(DEFAULT_BASELINE_SPEED, 0.0, 50.0,
                "Speed at spawn, restored on respawn"),
            "speed_jitter": number_schema(DEFAULT_SPEED_JITTER, 0.0, 50.0,
                "Width of the extra uniform speed added at spawn"),
            "population": integer_schema(DEFAULT_POPULATION as u64, 0, 100_000,
                "Number of particles"),
            "spawn_min": number_schema(DEFAULT_SPAWN_MIN, 0.0, 2000.0,
                "Inner edge of the spawn band (must exceed Rs)"),
            "spawn_max": number_schema(DEFAULT_SPAWN_MAX, 0.0, 2000.0,
                "Outer edge of the spawn band"),
        })
    }
}
