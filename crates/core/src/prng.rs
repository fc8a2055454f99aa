//! Seedable Xorshift64 generator used to scatter particles at spawn time.
//!
//! The dynamics are deterministic once a store exists; randomness only enters
//! through [`Xorshift64`] during initialization, so a `(params, seed)` pair
//! reproduces a run bit-for-bit on every platform.

use std::f64::consts::TAU;

/// Xorshift64 PRNG with the (13, 7, 17) shift triple.
///
/// A zero seed is a fixed point of the recurrence and is swapped for a
/// non-zero fallback.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const ZERO_SEED_FALLBACK: u64 = 0x0F11_BF1E_1D5E_ED00;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 {
                Self::ZERO_SEED_FALLBACK
            } else {
                seed
            },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in [0, 1), built from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform in [min, max). Returns `min` when the range is empty.
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        let v = min + self.next_f64() * (max - min);
        // rounding can land exactly on `max` for wide ranges
        if v >= max {
            min
        } else {
            v
        }
    }

    /// Uniform polar angle in [0, 2π).
    pub fn next_angle(&mut self) -> f64 {
        self.next_range(0.0, TAU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_7_produces_known_sequence() {
        // Reference values computed independently for shifts (13, 7, 17).
        let mut rng = Xorshift64::new(7);
        assert_eq!(rng.next_u64(), 7_575_888_327);
        assert_eq!(rng.next_u64(), 8_070_950_887_952_051_652);
    }

    #[test]
    fn zero_seed_is_replaced() {
        let mut rng = Xorshift64::new(0);
        assert!((0..8).all(|_| rng.next_u64() != 0));
    }

    #[test]
    fn equal_seeds_give_equal_streams() {
        let mut a = Xorshift64::new(150);
        let mut b = Xorshift64::new(150);
        for _ in 0..500 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn empty_range_returns_min() {
        let mut rng = Xorshift64::new(3);
        assert_eq!(rng.next_range(0.5, 0.5), 0.5);
    }

    #[test]
    fn angles_cover_the_circle() {
        let mut rng = Xorshift64::new(99);
        let mut quadrants = [false; 4];
        for _ in 0..1_000 {
            let a = rng.next_angle();
            assert!((0.0..TAU).contains(&a), "angle {a} out of [0, 2pi)");
            quadrants[(a / (TAU / 4.0)) as usize % 4] = true;
        }
        assert!(quadrants.iter().all(|&q| q), "angles missed a quadrant");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_stays_in_unit_interval(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..200 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "{v} outside [0, 1)");
                }
            }

            #[test]
            fn next_range_respects_bounds(
                seed: u64,
                min in -1e4_f64..1e4,
                width in 1e-6_f64..1e4,
            ) {
                let max = min + width;
                let mut rng = Xorshift64::new(seed);
                for _ in 0..200 {
                    let v = rng.next_range(min, max);
                    prop_assert!(v >= min && v < max, "{v} outside [{min}, {max})");
                }
            }
        }
    }
}
