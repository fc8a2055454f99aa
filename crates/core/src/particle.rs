//! Particle records and the fixed-size store that holds them.
//!
//! A [`ParticleStore`] is created once at simulation start and never resized.
//! The dynamics build a fresh store every tick, so a store handed to a render
//! consumer is an immutable snapshot of one tick.

use serde::{Deserialize, Serialize};

/// Radius at which particles cross from [`Regime::Normal`] into [`Regime::Flipped`].
///
/// Shared by the dynamics and the analytic sampler.
pub const DEFAULT_BOUNDARY_RADIUS: f64 = 100.0;

/// Behavioural mode of a particle. Each regime has its own integration rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Outside the boundary: accelerated inward by the attractor.
    #[default]
    Normal,
    /// Inside the boundary: constant inward drift until respawn.
    Flipped,
}

/// A single point particle in polar coordinates around the domain center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    id: u32,
    angle: f64,
    baseline_speed: f64,
    /// Distance from the domain center.
    pub radius: f64,
    /// Inward speed; only meaningful in [`Regime::Normal`].
    pub speed: f64,
    pub regime: Regime,
}

impl Particle {
    /// Spawns a `Normal` particle moving at `baseline_speed`.
    pub fn new(id: u32, radius: f64, angle: f64, baseline_speed: f64) -> Self {
        Self {
            id,
            angle,
            baseline_speed,
            radius,
            speed: baseline_speed,
            regime: Regime::Normal,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Polar angle in [0, 2π), fixed for the lifetime of the record.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Speed the particle was spawned with and returns to on respawn.
    pub fn baseline_speed(&self) -> f64 {
        self.baseline_speed
    }

    /// Puts the particle back at `radius` in the `Normal` regime with its spawn speed.
    ///
    /// Identity and angle are kept; the record is reused rather than recreated.
    pub fn respawn(&mut self, radius: f64) {
        self.radius = radius;
        self.speed = self.baseline_speed;
        self.regime = Regime::Normal;
    }

    /// Cartesian offset from the domain center, `(r cos θ, r sin θ)`.
    pub fn offset(&self) -> (f64, f64) {
        let (sin, cos) = self.angle.sin_cos();
        (self.radius * cos, self.radius * sin)
    }
}

/// Number of particles in each regime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub normal: usize,
    pub flipped: usize,
}

/// Fixed-size collection of particles, indexed in creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    /// Builds the next store by mapping every particle exactly once.
    ///
    /// The length is preserved, which is what keeps the store fixed-size
    /// across ticks.
    pub fn map(&self, f: impl FnMut(&Particle) -> Particle) -> Self {
        Self {
            particles: self.particles.iter().map(f).collect(),
        }
    }

    /// Counts particles per regime.
    pub fn census(&self) -> Census {
        self.particles
            .iter()
            .fold(Census::default(), |mut c, p| {
                match p.regime {
                    Regime::Normal => c.normal += 1,
                    Regime::Flipped => c.flipped += 1,
                }
                c
            })
    }
}

impl<'a> IntoIterator for &'a ParticleStore {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}
