//! Top-level engine façade crate (spec §4.M / §6): composes
//! `direwood-core`, `direwood-sim`, and `direwood-wolf` into the single
//! `GameEngine` entry point a host (browser/wasm, native test harness)
//! drives one tick at a time.

#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod snapshot;

pub use config::EngineConfig;
pub use engine::{
    EntityPosition, GameEngine, GameState, GameStateInfo, PerformanceMetrics, WaveInfo,
};
pub use error::EngineError;

pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::engine::{
        EntityPosition, GameEngine, GameState, GameStateInfo, PerformanceMetrics, WaveInfo,
    };
    pub use crate::error::EngineError;
    pub use crate::snapshot::compute_hash;
}
