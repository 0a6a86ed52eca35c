//! Random number helpers shared by every stochastic system.
//!
//! The world owns a single [`SimRng`] stream. Phases that run in parallel
//! derive an independent per-agent stream from `(seed, agent id, tick)` so the
//! result does not depend on scheduling or thread count.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Generator type used throughout the simulation.
pub type SimRng = ChaCha8Rng;

/// Creates the world stream for a seed.
pub fn seeded(seed: u64) -> SimRng {
    SimRng::seed_from_u64(seed)
}

/// Derives a deterministic sub-stream keyed by agent id and tick.
pub fn substream(seed: u64, agent_id: u64, tick: u64) -> SimRng {
    let key = mix(mix(seed ^ 0x9E37_79B9_7F4A_7C15) ^ agent_id) ^ tick.rotate_left(32);
    SimRng::seed_from_u64(mix(key))
}

/// Stream used after loading a saved world at `tick`.
pub fn resume(seed: u64, tick: u64) -> SimRng {
    substream(seed, u64::MAX, tick)
}

/// Draws from `N(0, std_dev)`; a non-positive deviation yields zero.
#[inline]
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, std_dev: f32) -> f32 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    let z: f32 = rng.sample(StandardNormal);
    z * std_dev
}

/// Splitmix64 finaliser.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
