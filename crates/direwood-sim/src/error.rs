//! Error taxonomy for `direwood-sim` (spec §7). As in `direwood-core`,
//! gameplay-level faults never cross the public API as `Result` -- these
//! variants exist for internal assertions and debug-build panics only.

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("dt {0} outside the allowed range [0, 0.05]")]
    InvalidDt(f64),

    #[error("pathfinder exceeded node limit ({0}) without reaching the goal")]
    PathfinderNodeLimitExceeded(u32),
}
