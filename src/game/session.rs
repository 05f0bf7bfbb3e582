//! Cross-question session state and round sequencing.

use std::sync::Arc;
use std::time::Duration;

use derive_getters::Getters;
use derive_setters::Setters;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, instrument, warn};

use crate::api::{AnswerEvaluator, QuestionSource, ServiceError};
use crate::game::{
    GameError, GameEvent, Generation, Question, RoundController, RoundUpdate, ShareSummary,
    TaskGuard,
};

/// Points for a correct answer in the standard game.
pub const DEFAULT_POINTS_PER_CORRECT: u32 = 10;

/// How long a resolved round stays on screen in the standard game.
pub const DEFAULT_EXPIRY_DELAY: Duration = Duration::from_millis(2000);

/// Scoring and pacing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct GameRules {
    points_per_correct: u32,
    expiry_delay: Duration,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            points_per_correct: DEFAULT_POINTS_PER_CORRECT,
            expiry_delay: DEFAULT_EXPIRY_DELAY,
        }
    }
}

/// Score, tallies and position in the question batch.
///
/// `correct + incorrect <= index + 1` holds at every point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters)]
pub struct SessionState {
    index: usize,
    total: usize,
    score: u32,
    correct: u32,
    incorrect: u32,
    game_over: bool,
}

impl SessionState {
    /// 1-based number of the current question.
    pub fn question_number(&self) -> usize {
        self.index + 1
    }

    /// Questions left after the current one.
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.index + 1)
    }

    /// Progress through the batch as a percentage.
    pub fn percent_complete(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.index + 1) as f64 / self.total as f64 * 100.0
    }

    /// Number of rounds that have reported a verdict.
    pub fn answered(&self) -> u32 {
        self.correct + self.incorrect
    }
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone)]
pub enum SessionStatus {
    /// Created, nothing fetched yet.
    NotStarted,
    /// Question fetch in flight.
    Loading,
    /// Question fetch failed; call [`SessionController::start`] to retry.
    LoadFailed(ServiceError),
    /// A round is live.
    Playing,
    /// All questions played, or the batch was empty.
    GameOver,
}

/// Observable result of applying one [`GameEvent`].
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    /// Questions arrived and the first round is live.
    Started {
        /// Questions in the batch.
        total: usize,
    },
    /// The question fetch failed.
    LoadFailed(ServiceError),
    /// The live round received its verdict and the session was credited.
    RoundResolved {
        /// Whether the guess was right.
        correct: bool,
        /// Explanatory fact for the question.
        fact: String,
    },
    /// The answer check failed; the round is idle again and nothing was scored.
    CheckFailed(ServiceError),
    /// The next question's round is live.
    Advanced {
        /// New question index.
        index: usize,
    },
    /// The session is over.
    GameOver,
    /// The event belonged to a superseded load or round and was dropped.
    Stale {
        /// Generation carried by the dropped event.
        generation: Generation,
    },
    /// The event was rejected by the round state machine.
    Rejected(GameError),
}

/// Owns the session state and the single live round, and applies
/// background completions in order.
///
/// Background tasks report through an internal channel. Drive the session by
/// awaiting [`SessionController::next_update`] or by calling
/// [`SessionController::pump`] from a UI loop.
pub struct SessionController {
    source: Arc<dyn QuestionSource>,
    evaluator: Arc<dyn AnswerEvaluator>,
    rules: GameRules,
    questions: Vec<Question>,
    state: SessionState,
    status: SessionStatus,
    round: Option<RoundController>,
    generation: Generation,
    load_generation: Option<Generation>,
    load_task: Option<TaskGuard>,
    last_resolved: Option<Generation>,
    events_tx: UnboundedSender<GameEvent>,
    events_rx: UnboundedReceiver<GameEvent>,
}

impl SessionController {
    /// Creates a session that has not started loading yet.
    #[instrument(skip(source, evaluator))]
    pub fn new(
        source: Arc<dyn QuestionSource>,
        evaluator: Arc<dyn AnswerEvaluator>,
        rules: GameRules,
    ) -> Self {
        info!("Creating game session");
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            source,
            evaluator,
            rules,
            questions: Vec::new(),
            state: SessionState::default(),
            status: SessionStatus::NotStarted,
            round: None,
            generation: Generation::default(),
            load_generation: None,
            load_task: None,
            last_resolved: None,
            events_tx,
            events_rx,
        }
    }

    /// Current score, tallies and position.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Lifecycle status.
    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// Scoring and pacing parameters.
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// The live round, if any.
    pub fn round(&self) -> Option<&RoundController> {
        self.round.as_ref()
    }

    /// The question of the live round, if any.
    pub fn current_question(&self) -> Option<&Question> {
        self.round.as_ref().map(RoundController::question)
    }

    /// True while a question fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.status, SessionStatus::Loading)
    }

    /// Starts fetching the question batch.
    ///
    /// Also the retry path after a failed load. Ignored while a round is live.
    #[instrument(skip(self))]
    pub fn start(&mut self) {
        if matches!(self.status, SessionStatus::Playing) {
            warn!("Session already playing; use restart");
            return;
        }
        let generation = self.bump_generation();
        self.load_generation = Some(generation);
        self.status = SessionStatus::Loading;
        info!(generation = %generation, "Fetching questions");

        let source = Arc::clone(&self.source);
        let events = self.events_tx.clone();
        self.load_task = Some(TaskGuard::spawn("question-fetch", async move {
            let result = source.fetch_questions().await;
            let _ = events.send(GameEvent::QuestionsLoaded { generation, result });
        }));
    }

    /// Discards the live round and any pending work, resets the state and
    /// fetches a fresh batch.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        info!(score = self.state.score, "Restarting session");
        self.teardown();
        self.questions.clear();
        self.state = SessionState::default();
        self.last_resolved = None;
        self.status = SessionStatus::NotStarted;
        self.start();
    }

    /// Cancels the live round's timers and any in-flight load.
    ///
    /// Completions already queued become stale and are dropped when applied.
    #[instrument(skip(self))]
    pub fn teardown(&mut self) {
        if let Some(mut round) = self.round.take() {
            debug!(generation = %round.generation(), "Discarding live round");
            round.teardown();
        }
        if let Some(mut task) = self.load_task.take() {
            task.cancel();
        }
        self.load_generation = None;
    }

    /// Submits a guess on the live round.
    #[instrument(skip(self))]
    pub fn submit_guess(&mut self, option: &str) -> Result<(), GameError> {
        let round = self.round.as_mut().ok_or(GameError::NoActiveRound)?;
        round.submit_guess(option)
    }

    /// Submits the option at `index` (0-based) on the live round.
    #[instrument(skip(self))]
    pub fn submit_option(&mut self, index: usize) -> Result<(), GameError> {
        let round = self.round.as_mut().ok_or(GameError::NoActiveRound)?;
        let option = round
            .question()
            .option(index)
            .ok_or_else(|| GameError::UnknownOption(format!("option #{}", index + 1)))?
            .to_string();
        round.submit_guess(&option)
    }

    /// Credits the session for the live round once it has reached a resolved
    /// phase. A round resolves at most once.
    #[instrument(skip(self))]
    pub fn on_round_resolved(
        &mut self,
        generation: Generation,
        correct: bool,
    ) -> Result<(), GameError> {
        let round = self.round.as_ref().ok_or(GameError::NoActiveRound)?;
        if round.generation() != generation {
            warn!(generation = %generation, live = %round.generation(), "Resolution for a round that is not live");
            return Err(GameError::NotLiveRound(generation));
        }
        if self.last_resolved == Some(generation) {
            error!(generation = %generation, "Round resolved twice");
            return Err(GameError::AlreadyResolved(generation));
        }
        if !round.phase().is_resolved() {
            warn!(generation = %generation, phase = %round.phase(), "Resolution before a verdict");
            return Err(GameError::InvalidTransition(round.phase()));
        }
        self.last_resolved = Some(generation);

        if correct {
            self.state.score += self.rules.points_per_correct;
            self.state.correct += 1;
        } else {
            self.state.incorrect += 1;
        }
        debug_assert!(self.state.answered() as usize <= self.state.index + 1);
        info!(
            correct,
            score = self.state.score,
            correct_count = self.state.correct,
            incorrect_count = self.state.incorrect,
            "Round credited"
        );
        Ok(())
    }

    /// Waits for the next background completion and applies it.
    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        let event = self.events_rx.recv().await?;
        Some(self.handle_event(event))
    }

    /// Applies every completion that is already queued, without waiting.
    pub fn pump(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            updates.push(self.handle_event(event));
        }
        updates
    }

    /// Applies one completion, dropping it if its generation is superseded.
    #[instrument(skip(self, event), fields(generation = %event.generation()))]
    pub fn handle_event(&mut self, event: GameEvent) -> SessionUpdate {
        match event {
            GameEvent::QuestionsLoaded { generation, result } => {
                if self.load_generation != Some(generation) {
                    return self.stale(generation);
                }
                self.load_generation = None;
                self.load_task = None;
                match result {
                    Ok(questions) => self.begin(questions),
                    Err(e) => {
                        warn!(error = %e, "Question fetch failed");
                        self.status = SessionStatus::LoadFailed(e.clone());
                        SessionUpdate::LoadFailed(e)
                    }
                }
            }
            GameEvent::VerdictReceived { generation, result } => {
                let outcome = match self.round.as_mut() {
                    Some(round) if round.generation() == generation => round
                        .apply_verdict(result)
                        .map(|update| (update, round.fact().unwrap_or_default().to_string())),
                    _ => return self.stale(generation),
                };
                match outcome {
                    Ok((RoundUpdate::Resolved { correct }, fact)) => {
                        match self.on_round_resolved(generation, correct) {
                            Ok(()) => SessionUpdate::RoundResolved { correct, fact },
                            Err(e) => SessionUpdate::Rejected(e),
                        }
                    }
                    Ok((RoundUpdate::CheckFailed(e), _)) => SessionUpdate::CheckFailed(e),
                    Err(e) => SessionUpdate::Rejected(e),
                }
            }
            GameEvent::RoundExpired { generation } => {
                let expired = match self.round.as_mut() {
                    Some(round) if round.generation() == generation => round.expire(),
                    _ => return self.stale(generation),
                };
                match expired {
                    Ok(()) => self.advance(),
                    Err(e) => SessionUpdate::Rejected(e),
                }
            }
        }
    }

    /// Builds the share summary once the session is over.
    #[instrument(skip(self))]
    pub fn summary(&self, share_url: &str) -> Option<ShareSummary> {
        self.state.game_over.then(|| {
            ShareSummary::from_state(&self.state, self.rules.points_per_correct, share_url)
        })
    }

    fn begin(&mut self, questions: Vec<Question>) -> SessionUpdate {
        if questions.is_empty() {
            info!("Empty question batch; session over");
            self.questions.clear();
            self.state = SessionState {
                game_over: true,
                ..SessionState::default()
            };
            self.status = SessionStatus::GameOver;
            return SessionUpdate::GameOver;
        }

        let total = questions.len();
        info!(total, "Session started");
        self.questions = questions;
        self.state = SessionState {
            total,
            ..SessionState::default()
        };
        self.last_resolved = None;
        self.status = SessionStatus::Playing;
        self.open_round(0);
        SessionUpdate::Started { total }
    }

    fn advance(&mut self) -> SessionUpdate {
        if let Some(mut round) = self.round.take() {
            round.teardown();
        }

        if self.state.index + 1 < self.state.total {
            self.state.index += 1;
            self.open_round(self.state.index);
            info!(index = self.state.index, "Advanced to next question");
            SessionUpdate::Advanced {
                index: self.state.index,
            }
        } else {
            self.state.game_over = true;
            self.status = SessionStatus::GameOver;
            info!(score = self.state.score, "Game over");
            SessionUpdate::GameOver
        }
    }

    fn open_round(&mut self, index: usize) {
        let Some(question) = self.questions.get(index).cloned() else {
            error!(index, "No question at index");
            return;
        };
        let generation = self.bump_generation();
        self.round = Some(RoundController::new(
            generation,
            question,
            Arc::clone(&self.evaluator),
            self.events_tx.clone(),
            self.rules.expiry_delay,
        ));
    }

    fn bump_generation(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.generation
    }

    fn stale(&self, generation: Generation) -> SessionUpdate {
        debug!(generation = %generation, current = %self.generation, "Dropping stale completion");
        SessionUpdate::Stale { generation }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state)
            .field("status", &self.status)
            .field("round", &self.round)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
