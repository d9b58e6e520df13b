//! Error taxonomy for `direwood-core` (spec §7).
//!
//! Gameplay-level faults (entity store full, unknown id) are not surfaced as
//! `Result` across the public API -- they degrade to sentinels or no-ops per
//! spec §7. `CoreError` exists for the few cases an internal caller wants to
//! distinguish a genuine logic error (double-free, corrupt snapshot) from a
//! routine miss.

use crate::entity::EntityId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The entity does not exist (stale generation or never allocated).
    #[error("entity {0:?} does not exist (stale or never allocated)")]
    StaleEntity(EntityId),

    /// `EntityStore::create` was called while at `MAX_ENTITIES` capacity.
    #[error("entity store is full ({0} entities); spawn skipped")]
    StoreFull(usize),
}
