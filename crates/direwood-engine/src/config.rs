//! Engine construction-time configuration (spec §9 "configuration is a
//! plain value at construction; no process-wide mutability").

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineConfig {
    pub world_width: f64,
    pub world_height: f64,
    pub seed: u64,
    /// Multiplier applied to spawned wolves' health/damage alongside the
    /// per-wave scaling (spec §4.M).
    pub difficulty: f64,
    /// Cell size for the pathfinder grid (world units per cell).
    pub pathfinder_cell_size: f64,
    pub ticks_per_second: f64,
}

impl EngineConfig {
    pub fn new(world_width: f64, world_height: f64, seed: u64) -> Self {
        Self {
            world_width,
            world_height,
            seed,
            difficulty: 1.0,
            pathfinder_cell_size: 20.0,
            ticks_per_second: 60.0,
        }
    }
}
