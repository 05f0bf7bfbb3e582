#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;

use globetrotter::{
    AnswerEvaluator, GameRules, Question, QuestionId, QuestionSource, ServiceError,
    ServiceErrorKind, SessionController, SessionUpdate, Verdict,
};

/// Builds `n` questions whose right answer is `Answer {i}`.
pub fn sample_questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| {
            Question::new(
                QuestionId::from(format!("q{}", i)),
                vec![format!("Clue one for {}", i), format!("Clue two for {}", i)],
                vec![
                    format!("Decoy {}", i),
                    format!("Answer {}", i),
                    format!("Other {}", i),
                ],
            )
        })
        .collect()
}

pub fn right_answer(i: usize) -> String {
    format!("Answer {}", i)
}

pub fn wrong_answer(i: usize) -> String {
    format!("Decoy {}", i)
}

pub fn network_error() -> ServiceError {
    ServiceError::new(ServiceErrorKind::Network, "connection refused")
}

/// Returns queued batches in order, then empty batches.
pub struct ScriptedSource {
    batches: Mutex<VecDeque<Result<Vec<Question>, ServiceError>>>,
    pub calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(batches: Vec<Result<Vec<Question>, ServiceError>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(questions: Vec<Question>) -> Self {
        Self::new(vec![Ok(questions.clone()), Ok(questions.clone()), Ok(questions)])
    }
}

#[async_trait]
impl QuestionSource for ScriptedSource {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Judges `Answer {i}` right for question `q{i}`. Fails the first
/// `failures` checks with a network error.
pub struct KeyedEvaluator {
    failures: AtomicUsize,
    pub calls: AtomicUsize,
}

impl KeyedEvaluator {
    pub fn new() -> Self {
        Self::failing_first(0)
    }

    pub fn failing_first(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AnswerEvaluator for KeyedEvaluator {
    async fn check_answer(
        &self,
        question: &QuestionId,
        answer: &str,
    ) -> Result<Verdict, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(network_error());
        }
        let expected = format!("Answer {}", question.as_str().trim_start_matches('q'));
        Ok(Verdict::new(
            answer == expected,
            format!("Fact about {}", question),
        ))
    }
}

/// Holds every check until [`GatedEvaluator::open`] is called.
pub struct GatedEvaluator {
    gate: Notify,
    inner: KeyedEvaluator,
}

impl GatedEvaluator {
    pub fn new() -> Self {
        Self {
            gate: Notify::new(),
            inner: KeyedEvaluator::new(),
        }
    }

    pub fn open(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl AnswerEvaluator for GatedEvaluator {
    async fn check_answer(
        &self,
        question: &QuestionId,
        answer: &str,
    ) -> Result<Verdict, ServiceError> {
        self.gate.notified().await;
        self.inner.check_answer(question, answer).await
    }
}

pub fn session_with(
    source: Arc<dyn QuestionSource>,
    evaluator: Arc<dyn AnswerEvaluator>,
) -> SessionController {
    SessionController::new(source, evaluator, GameRules::default())
}

/// Waits for the next update, failing the test if the channel closes.
pub async fn next(session: &mut SessionController) -> SessionUpdate {
    session
        .next_update()
        .await
        .expect("session event channel closed")
}

/// Checks the tally invariant on a live session.
pub fn assert_tally_invariant(session: &SessionController) {
    let state = session.state();
    assert!(
        state.answered() as usize <= state.index() + 1,
        "answered {} exceeds question number {}",
        state.answered(),
        state.index() + 1
    );
}
