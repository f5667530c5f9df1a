//! Random stop generation
//!
//! Stops come from the operating system CSPRNG by default. Any
//! [`TryRngCore`] can be supplied instead (seeded generators in tests), but an
//! entropy failure is always propagated and never replaced by a weaker source.

use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::error::{SlotError, SlotResult};

/// Draw one uniform stop in `[0, strip_length)` per reel from the OS CSPRNG.
pub fn generate_stops(reel_count: usize, strip_length: usize) -> SlotResult<Vec<usize>> {
    generate_stops_with(&mut OsRng, reel_count, strip_length)
}

/// Draw one uniform stop in `[0, strip_length)` per reel from `rng`.
pub fn generate_stops_with<R: TryRngCore + ?Sized>(
    rng: &mut R,
    reel_count: usize,
    strip_length: usize,
) -> SlotResult<Vec<usize>> {
    let bound = u32::try_from(strip_length)
        .ok()
        .filter(|&b| b > 0)
        .ok_or(SlotError::InvalidStripLength)?;

    (0..reel_count)
        .map(|_| uniform_below(rng, bound).map(|v| v as usize))
        .collect()
}

/// Unbiased value in `[0, bound)` by rejection sampling.
fn uniform_below<R: TryRngCore + ?Sized>(rng: &mut R, bound: u32) -> SlotResult<u32> {
    // Largest multiple of `bound` that fits; values at or above it are redrawn
    let zone = u32::MAX - (u32::MAX % bound);
    loop {
        let value = rng
            .try_next_u32()
            .map_err(|e| SlotError::Entropy(e.to_string()))?;
        if value < zone {
            return Ok(value % bound);
        }
    }
}
