//! Error taxonomy for `direwood-wolf` (spec §7). As elsewhere in the
//! workspace, these exist for internal assertions only -- a wolf with a
//! dangling target or an empty pack degrades to a safe state rather than
//! surfacing a `Result` to the caller.

#[derive(Debug, thiserror::Error)]
pub enum WolfError {
    #[error("pack {0} has no alpha to elect from")]
    NoElectableAlpha(u32),

    #[error("wolf {0:?} is not registered with the manager")]
    UnknownWolf(direwood_core::entity::EntityId),
}
