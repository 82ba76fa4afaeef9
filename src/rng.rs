//! Seeded random source shared by the trail simulation and the world generator.
//!
//! A single 32-bit linear congruential generator drives every draw in a
//! generation pass. Consumers take `&mut impl RandomSource` so the stream is
//! injected explicitly; the order in which they draw is part of the
//! reproducibility contract (see `sector::compose_sector` and
//! `context::GenerationContext::snapshot`).

use std::f64::consts::TAU;

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// A stream of uniform floats in [0, 1).
///
/// Only `next_f64` is required; the dice helpers are expressed in terms of it
/// so every implementation consumes exactly one draw per helper call
/// (`roll(n)` consumes `n`).
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `lo..=hi`.
    fn next_int(&mut self, lo: i32, hi: i32) -> i32 {
        debug_assert!(lo <= hi);
        let span = (hi - lo + 1) as f64;
        let v = lo + (self.next_f64() * span).floor() as i32;
        v.min(hi)
    }

    /// One six-sided die.
    fn d6(&mut self) -> i32 {
        self.next_int(1, 6)
    }

    /// Sum of `n` six-sided dice.
    fn roll(&mut self, n: u32) -> i32 {
        (0..n).map(|_| self.d6()).sum()
    }

    /// Uniform angle in [0, 2π).
    fn angle(&mut self) -> f64 {
        self.next_f64() * TAU
    }
}

/// `state = state * 1664525 + 1013904223 (mod 2^32)`; output `state / 2^32`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LcgRng {
    state: u32,
}

impl LcgRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Reset the stream. Re-seeding with the same value replays the same draws.
    pub fn set_seed(&mut self, seed: u32) {
        self.state = seed;
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for LcgRng {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state as f64 / TWO_POW_32
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sequence() {
        let mut rng = LcgRng::new(0);
        rng.next_f64();
        assert_eq!(rng.state(), 1_013_904_223);
        rng.next_f64();
        // 1013904223 * 1664525 + 1013904223 mod 2^32
        let expected = 1_013_904_223u64 * 1_664_525 + 1_013_904_223;
        assert_eq!(rng.state() as u64, expected % (1u64 << 32));
    }

    #[test]
    fn test_range_and_reseed() {
        let mut rng = LcgRng::new(12345);
        let first: Vec<f64> = (0..1000).map(|_| rng.next_f64()).collect();
        assert!(first.iter().all(|&v| (0.0..1.0).contains(&v)));

        rng.set_seed(12345);
        let again: Vec<f64> = (0..1000).map(|_| rng.next_f64()).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn test_dice_bounds() {
        let mut rng = LcgRng::new(7);
        for _ in 0..2000 {
            let d = rng.d6();
            assert!((1..=6).contains(&d));
            let r = rng.roll(2);
            assert!((2..=12).contains(&r));
            let n = rng.next_int(1, 4);
            assert!((1..=4).contains(&n));
        }
    }

    #[test]
    fn test_dice_cover_all_faces() {
        let mut rng = LcgRng::new(99);
        let mut seen = [false; 6];
        for _ in 0..500 {
            seen[(rng.d6() - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
