//! Asynchronous completions delivered back to the session.
//!
//! Every spawned network call or timer reports through a [`GameEvent`]
//! stamped with the [`Generation`] that launched it. The session applies an
//! event only if that generation is still the live one.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::api::ServiceError;
use crate::game::{Question, Verdict};

/// Monotonically increasing marker for a question load or a round.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, Serialize, Deserialize,
)]
#[display("gen#{_0}")]
pub struct Generation(u64);

impl Generation {
    /// Returns the following generation.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A completion posted by a background task.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// The question fetch launched under `generation` finished.
    QuestionsLoaded {
        /// Load that produced this result.
        generation: Generation,
        /// Validated batch or the failure.
        result: Result<Vec<Question>, ServiceError>,
    },
    /// The answer check for round `generation` finished.
    VerdictReceived {
        /// Round that submitted the guess.
        generation: Generation,
        /// Verdict or the failure.
        result: Result<Verdict, ServiceError>,
    },
    /// The display delay of round `generation` elapsed.
    RoundExpired {
        /// Round whose delay elapsed.
        generation: Generation,
    },
}

impl GameEvent {
    /// Generation the event belongs to.
    pub fn generation(&self) -> Generation {
        match self {
            Self::QuestionsLoaded { generation, .. }
            | Self::VerdictReceived { generation, .. }
            | Self::RoundExpired { generation } => *generation,
        }
    }
}
