//! Deterministic random number generation.
//!
//! RULE: Nothing in the engine may call any platform RNG.
//! All randomness flows through a `LifeRng` handed in by the caller,
//! so a session replays identically under the same seed.
//!
//! Production sessions use `SimRng` streams derived from one master seed:
//!   - The engine stream drives every simulation roll.
//!   - Tooling (e.g. the runner's autopilot) draws from its own stream,
//!     so picking options never shifts the engine's sequence.
//!
//! Tests use `ScriptedRng` to force exact branches.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use std::collections::VecDeque;
use uuid::Uuid;

/// The single randomness interface consumed by the engine.
///
/// Only `next_f64` is required; every other draw derives from it unless
/// the implementation can do better.
pub trait LifeRng {
    /// Roll a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64;

    /// Draw a raw u64 (full range).
    fn next_u64(&mut self) -> u64 {
        (self.next_f64() * u64::MAX as f64) as u64
    }

    /// Roll a u64 in [0, n).
    fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        ((self.next_f64() * n as f64) as u64).min(n - 1)
    }

    /// Bernoulli trial: returns true with probability p.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform integer in [lo, hi]. Returns `lo` when the range is empty.
    fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo + 1) as u64;
        lo + self.next_u64_below(span) as i64
    }

    /// Uniform index into a collection of `len` items.
    fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.next_u64_below(len as u64) as usize)
        }
    }

    /// A v4-shaped UUID built from this stream's bytes.
    fn uuid(&mut self) -> Uuid {
        let hi = self.next_u64().to_be_bytes();
        let lo = self.next_u64().to_be_bytes();
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&hi);
        bytes[8..].copy_from_slice(&lo);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

/// Pick a uniformly random element from a slice.
pub fn pick<'a, T>(rng: &mut dyn LifeRng, items: &'a [T]) -> Option<&'a T> {
    rng.index(items.len()).map(|i| &items[i])
}

// ── Production stream ──────────────────────────────────────────────────────

/// A named, deterministic PCG stream.
pub struct SimRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SimRng {
    /// The engine stream for `master_seed`.
    pub fn new(master_seed: u64) -> Self {
        Self::for_stream(master_seed, RngStream::Engine)
    }

    /// Derive a stream from the master seed and a stable stream index.
    /// The index must never change once assigned.
    pub fn for_stream(master_seed: u64, stream: RngStream) -> Self {
        let derived_seed =
            master_seed ^ ((stream as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: stream.name(),
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }
}

impl LifeRng for SimRng {
    fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }

    fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }
}

/// Stable stream assignments.
/// NEVER reorder or remove entries. Only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum RngStream {
    Engine = 0,
    Autopilot = 1,
}

impl RngStream {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Engine => "engine",
            Self::Autopilot => "autopilot",
        }
    }
}

// ── Scripted stream ────────────────────────────────────────────────────────

/// Replays a fixed list of draws, then repeats `fallback` forever.
///
/// Integer draws are derived from the float (`floor(f * n)`), so a scripted
/// value of `0.0` always selects the first candidate and `0.99` the last.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    queue: VecDeque<f64>,
    fallback: f64,
    drawn: usize,
}

impl ScriptedRng {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            queue: draws.into_iter().collect(),
            fallback: 0.99,
            drawn: 0,
        }
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback.clamp(0.0, 0.999_999);
        self
    }

    /// Scripted draws not consumed yet.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Total draws served, scripted or fallback.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl LifeRng for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        self.drawn += 1;
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}
