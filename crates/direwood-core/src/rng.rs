//! The single deterministic pseudo-random generator shared by every system
//! that needs randomness (spec §5 "RNG"): wave edge selection, obstacle
//! placement, ambush-spot tiebreaks, and pack role randomness.
//!
//! `Pcg32` is small, fast, and -- crucially -- produces the same sequence on
//! every platform for a given seed, including the `wasm32` target
//! `direwood-wasm` compiles to. A single instance is owned by the engine
//! façade and threaded through by `&mut` reference; there is no
//! thread-local or global RNG anywhere in the workspace.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Deterministic RNG wrapper. Cheap to construct, cheap to clone the
/// underlying state is intentionally *not* `Clone` -- callers that need to
/// fork a simulation branch should reseed explicitly so the fork point is
/// visible at the call site.
pub struct SimRng {
    inner: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Uniform float in `[0.0, 1.0)`.
    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform integer in `[low, high]` inclusive.
    pub fn gen_range_u32(&mut self, low: u32, high: u32) -> u32 {
        if low >= high {
            return low;
        }
        self.inner.gen_range(low..=high)
    }

    /// Uniform float in `[low, high)`.
    pub fn gen_range_f64(&mut self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.inner.gen_range(low..high)
    }

    /// `true` with probability `p` (clamped to `[0,1]`).
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p.clamp(0.0, 1.0)
    }

    /// Pick one of the four world edges (0=top, 1=right, 2=bottom, 3=left),
    /// used by the wave system's edge-spawn (spec §4.F).
    pub fn pick_edge(&mut self) -> u8 {
        self.gen_range_u32(0, 3) as u8
    }
}
