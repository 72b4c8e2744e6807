// src/rng.rs
//
// The simulation consumes randomness through the `RandomSource` trait, so the
// generator can be swapped for a scripted sequence in tests. The production
// generator is a seeded Xoshiro256** (see `seeded`).

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

/// Default seed, used when the config does not supply one.
pub const DEFAULT_SEED: u64 = 0xDEAD_BEEF;

/// Uniform randomness as consumed by the Monte Carlo engine.
///
/// Implementations must draw `uniform01` from [0, 1) and `next_u32` from the
/// full 32-bit range. `rand_int` reduces a 32-bit draw modulo `span`; the
/// slight modulo bias is part of the documented site-selection behaviour and
/// is kept deliberately.
pub trait RandomSource {
    /// Uniform value in [0, 1).
    fn uniform01(&mut self) -> f64;

    /// Uniform 32-bit integer.
    fn next_u32(&mut self) -> u32;

    /// Uniform integer in [0, span) by modulo reduction.
    fn rand_int(&mut self, span: usize) -> usize {
        debug_assert!(span > 0 && span <= u32::MAX as usize);
        self.next_u32() as usize % span
    }
}

impl RandomSource for Xoshiro256StarStar {
    fn uniform01(&mut self) -> f64 {
        rand::Rng::gen::<f64>(self)
    }

    fn next_u32(&mut self) -> u32 {
        rand::RngCore::next_u32(self)
    }
}

/// Seeded production generator.
pub fn seeded(seed: u64) -> Xoshiro256StarStar {
    Xoshiro256StarStar::seed_from_u64(seed)
}

#[cfg(test)]
pub mod testing {
    use super::RandomSource;

    /// Replays a fixed sequence of draws; panics when the script runs dry.
    pub struct ScriptedSource {
        uniforms: Vec<f64>,
        ints: Vec<u32>,
        u_pos: usize,
        i_pos: usize,
    }

    impl ScriptedSource {
        pub fn new(uniforms: Vec<f64>, ints: Vec<u32>) -> Self {
            Self {
                uniforms,
                ints,
                u_pos: 0,
                i_pos: 0,
            }
        }
    }

    impl RandomSource for ScriptedSource {
        fn uniform01(&mut self) -> f64 {
            let v = self.uniforms[self.u_pos];
            self.u_pos += 1;
            v
        }

        fn next_u32(&mut self) -> u32 {
            let v = self.ints[self.i_pos];
            self.i_pos += 1;
            v
        }
    }
}
