//! Per-tick simulation systems (spec §4.D/E/F/G/H): collision resolution,
//! physics integration, the wave spawner, the visual-effects buffer, and the
//! grid pathfinder. `direwood-engine` owns the fixed tick order these systems
//! run in (spec §4.M); this crate only owns each system's own state.

#![deny(unsafe_code)]

pub mod collision;
pub mod error;
pub mod pathfinder;
pub mod physics;
pub mod vfx;
pub mod wave;

pub use error::SimError;

pub mod prelude {
    pub use crate::collision::{self, CollisionStats};
    pub use crate::error::SimError;
    pub use crate::pathfinder::{find_path, Grid, PathCache};
    pub use crate::physics::{self, WorldBounds};
    pub use crate::vfx::{Particle, ScreenShake, VfxBuffer};
    pub use crate::wave::{SpawnRequest, WaveState, WaveSystem};
}
