//! Error taxonomy for `direwood-engine` (spec §7). The public API never
//! returns these -- `update`/`create_*`/etc. clamp, no-op, or return a
//! sentinel id instead. They exist for the "programmer error" category
//! (spec §7: "tick called before start_game ... panic in debug builds;
//! no-op in release").

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("update() called before start_game()")]
    NotStarted,

    #[error("transition from terminal state {0:?} attempted")]
    TerminalStateTransition(crate::engine::GameState),
}
