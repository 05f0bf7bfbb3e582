//! Errors raised by the round and session state machines.

use crate::game::{Generation, RoundPhase};

/// A rejected state-machine operation. State is never modified when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// The operation is not allowed in the current round phase.
    #[display("Operation not allowed while round is {}", _0)]
    InvalidTransition(RoundPhase),

    /// The guess is not one of the rendered options.
    #[display("'{}' is not an option for this question", _0)]
    UnknownOption(String),

    /// The generation does not belong to the live round.
    #[display("Round {} is not the live round", _0)]
    NotLiveRound(Generation),

    /// The round already reported its verdict to the session.
    #[display("Round {} was already resolved", _0)]
    AlreadyResolved(Generation),

    /// There is no live round (loading, failed, or game over).
    #[display("No round is active")]
    NoActiveRound,
}

impl std::error::Error for GameError {}
