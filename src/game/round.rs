//! Single-question interaction state machine.
//!
//! ```text
//! idle -[submit_guess]-> checking -[verdict]-> resolved-* -[expiry]-> idle (finished)
//!                        checking -[error]---> idle
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};

use crate::api::{AnswerEvaluator, ServiceError};
use crate::game::{GameError, GameEvent, Generation, Question, TaskGuard, Verdict};

/// Phase of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
pub enum RoundPhase {
    /// Waiting for the player to pick an option.
    Idle,
    /// Guess submitted, verdict pending.
    Checking,
    /// Verdict received: right answer.
    ResolvedCorrect,
    /// Verdict received: wrong answer.
    ResolvedIncorrect,
}

impl RoundPhase {
    /// True for either resolved phase.
    pub fn is_resolved(self) -> bool {
        matches!(self, Self::ResolvedCorrect | Self::ResolvedIncorrect)
    }
}

/// What applying a verdict did to the round.
#[derive(Debug, Clone)]
pub enum RoundUpdate {
    /// The round reached a resolved phase.
    Resolved {
        /// Whether the guess was right.
        correct: bool,
    },
    /// The check failed; the round is back to idle with no selection.
    CheckFailed(ServiceError),
}

/// Owns the per-question state: selection, phase, fact, and the pending
/// answer check and expiry timer.
///
/// Dropping the controller cancels both background tasks.
pub struct RoundController {
    generation: Generation,
    question: Question,
    phase: RoundPhase,
    selected: Option<String>,
    fact: Option<String>,
    last_error: Option<ServiceError>,
    finished: bool,
    phase_log: Vec<RoundPhase>,
    evaluator: Arc<dyn AnswerEvaluator>,
    events: UnboundedSender<GameEvent>,
    expiry_delay: Duration,
    pending_check: Option<TaskGuard>,
    expiry_timer: Option<TaskGuard>,
}

impl RoundController {
    /// Creates an idle round for `question`.
    #[instrument(skip(question, evaluator, events), fields(question_id = %question.id()))]
    pub fn new(
        generation: Generation,
        question: Question,
        evaluator: Arc<dyn AnswerEvaluator>,
        events: UnboundedSender<GameEvent>,
        expiry_delay: Duration,
    ) -> Self {
        debug!("Creating round");
        Self {
            generation,
            question,
            phase: RoundPhase::Idle,
            selected: None,
            fact: None,
            last_error: None,
            finished: false,
            phase_log: vec![RoundPhase::Idle],
            evaluator,
            events,
            expiry_delay,
            pending_check: None,
            expiry_timer: None,
        }
    }

    /// Generation stamped on this round's events.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The question being played.
    pub fn question(&self) -> &Question {
        &self.question
    }

    /// Current phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Option the player picked, while checking or resolved.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Explanatory fact, only present in a resolved phase.
    pub fn fact(&self) -> Option<&str> {
        self.fact.as_deref()
    }

    /// The most recent failed check, cleared by the next guess.
    pub fn last_error(&self) -> Option<&ServiceError> {
        self.last_error.as_ref()
    }

    /// True once the resolved phase has expired.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Every phase the round has entered, in order.
    pub fn phase_log(&self) -> &[RoundPhase] {
        &self.phase_log
    }

    /// True while the expiry timer is armed.
    pub fn expiry_pending(&self) -> bool {
        self.expiry_timer.as_ref().is_some_and(TaskGuard::is_pending)
    }

    /// Submits `option` for checking.
    ///
    /// Only accepted while idle. The check runs in the background and reports
    /// through a [`GameEvent::VerdictReceived`].
    #[instrument(skip(self), fields(generation = %self.generation, phase = %self.phase))]
    pub fn submit_guess(&mut self, option: &str) -> Result<(), GameError> {
        if self.phase != RoundPhase::Idle || self.finished {
            warn!("Guess rejected: round is not accepting selections");
            return Err(GameError::InvalidTransition(self.phase));
        }
        if !self.question.has_option(option) {
            warn!("Guess rejected: unknown option");
            return Err(GameError::UnknownOption(option.to_string()));
        }

        self.selected = Some(option.to_string());
        self.last_error = None;
        self.transition(RoundPhase::Checking);

        let evaluator = Arc::clone(&self.evaluator);
        let events = self.events.clone();
        let generation = self.generation;
        let question_id = self.question.id().clone();
        let answer = option.to_string();
        self.pending_check = Some(TaskGuard::spawn("answer-check", async move {
            let result = evaluator.check_answer(&question_id, &answer).await;
            let _ = events.send(GameEvent::VerdictReceived { generation, result });
        }));
        Ok(())
    }

    /// Applies the outcome of the answer check.
    ///
    /// A verdict resolves the round and arms the expiry timer. A failure
    /// returns the round to idle with the selection cleared.
    #[instrument(skip(self, result), fields(generation = %self.generation))]
    pub fn apply_verdict(
        &mut self,
        result: Result<Verdict, ServiceError>,
    ) -> Result<RoundUpdate, GameError> {
        if self.phase != RoundPhase::Checking {
            warn!(phase = %self.phase, "Verdict arrived outside of checking");
            return Err(GameError::InvalidTransition(self.phase));
        }
        self.pending_check = None;

        match result {
            Ok(verdict) => {
                let correct = *verdict.correct();
                self.fact = Some(verdict.fact().clone());
                self.transition(if correct {
                    RoundPhase::ResolvedCorrect
                } else {
                    RoundPhase::ResolvedIncorrect
                });
                self.expiry_timer = Some(TaskGuard::delay(
                    "round-expiry",
                    self.expiry_delay,
                    self.events.clone(),
                    GameEvent::RoundExpired {
                        generation: self.generation,
                    },
                ));
                Ok(RoundUpdate::Resolved { correct })
            }
            Err(e) => {
                warn!(error = %e, "Answer check failed; round back to idle");
                self.selected = None;
                self.last_error = Some(e.clone());
                self.transition(RoundPhase::Idle);
                Ok(RoundUpdate::CheckFailed(e))
            }
        }
    }

    /// Ends the resolved phase: clears selection and fact and marks the round finished.
    #[instrument(skip(self), fields(generation = %self.generation))]
    pub fn expire(&mut self) -> Result<(), GameError> {
        if !self.phase.is_resolved() {
            warn!(phase = %self.phase, "Expiry outside of a resolved phase");
            return Err(GameError::InvalidTransition(self.phase));
        }
        self.expiry_timer = None;
        self.selected = None;
        self.fact = None;
        self.finished = true;
        self.transition(RoundPhase::Idle);
        Ok(())
    }

    /// Cancels the pending check and expiry timer.
    pub fn teardown(&mut self) {
        if let Some(mut check) = self.pending_check.take() {
            check.cancel();
        }
        if let Some(mut timer) = self.expiry_timer.take() {
            timer.cancel();
        }
    }

    fn transition(&mut self, next: RoundPhase) {
        info!(from = %self.phase, to = %next, generation = %self.generation, "Round transition");
        self.phase = next;
        self.phase_log.push(next);
    }
}

impl Drop for RoundController {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for RoundController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundController")
            .field("generation", &self.generation)
            .field("question", &self.question.id())
            .field("phase", &self.phase)
            .field("selected", &self.selected)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
