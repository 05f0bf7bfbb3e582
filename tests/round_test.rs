//! Round state machine driven directly, without a session.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use globetrotter::{
    GameError, GameEvent, Generation, RoundController, RoundPhase, RoundUpdate, ServiceErrorKind,
};
use tokio::sync::mpsc;

const DELAY: Duration = Duration::from_millis(2000);

fn round(
    evaluator: Arc<KeyedEvaluator>,
) -> (RoundController, mpsc::UnboundedReceiver<GameEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let question = sample_questions(1).remove(0);
    let round = RoundController::new(Generation::default().next(), question, evaluator, tx, DELAY);
    (round, rx)
}

#[tokio::test(start_paused = true)]
async fn test_phase_log_for_a_correct_round() {
    let (mut round, mut rx) = round(Arc::new(KeyedEvaluator::new()));
    round.submit_guess(&right_answer(0)).unwrap();
    assert_eq!(round.phase(), RoundPhase::Checking);

    let Some(GameEvent::VerdictReceived { generation, result }) = rx.recv().await else {
        panic!("expected verdict event");
    };
    assert_eq!(generation, round.generation());
    assert!(matches!(
        round.apply_verdict(result).unwrap(),
        RoundUpdate::Resolved { correct: true }
    ));
    assert_eq!(round.fact(), Some("Fact about q0"));
    assert!(round.expiry_pending());

    let start = tokio::time::Instant::now();
    let Some(GameEvent::RoundExpired { .. }) = rx.recv().await else {
        panic!("expected expiry event");
    };
    assert!(start.elapsed() >= DELAY);
    round.expire().unwrap();

    assert!(round.is_finished());
    assert!(round.selected().is_none());
    assert!(round.fact().is_none());
    assert_eq!(
        round.phase_log(),
        &[
            RoundPhase::Idle,
            RoundPhase::Checking,
            RoundPhase::ResolvedCorrect,
            RoundPhase::Idle
        ]
    );
    assert!(matches!(
        round.submit_guess(&right_answer(0)),
        Err(GameError::InvalidTransition(RoundPhase::Idle))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_check_failure_returns_to_idle() {
    let (mut round, mut rx) = round(Arc::new(KeyedEvaluator::failing_first(1)));
    round.submit_guess(&wrong_answer(0)).unwrap();

    let Some(GameEvent::VerdictReceived { result, .. }) = rx.recv().await else {
        panic!("expected verdict event");
    };
    match round.apply_verdict(result).unwrap() {
        RoundUpdate::CheckFailed(e) => assert_eq!(e.kind(), ServiceErrorKind::Network),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(round.phase(), RoundPhase::Idle);
    assert!(round.selected().is_none());
    assert!(round.fact().is_none());
    assert!(!round.is_finished());
    assert_eq!(
        round.phase_log(),
        &[RoundPhase::Idle, RoundPhase::Checking, RoundPhase::Idle]
    );
}

#[tokio::test(start_paused = true)]
async fn test_out_of_order_operations_leave_state_untouched() {
    let (mut round, _rx) = round(Arc::new(KeyedEvaluator::new()));

    assert!(matches!(
        round.expire(),
        Err(GameError::InvalidTransition(RoundPhase::Idle))
    ));
    assert!(matches!(
        round.apply_verdict(Ok(globetrotter::Verdict::new(true, "x".to_string()))),
        Err(GameError::InvalidTransition(RoundPhase::Idle))
    ));
    assert!(matches!(
        round.submit_guess("Nowhere"),
        Err(GameError::UnknownOption(_))
    ));
    assert_eq!(round.phase_log(), &[RoundPhase::Idle]);
    assert!(round.selected().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_round_cancels_expiry() {
    let (mut round, mut rx) = round(Arc::new(KeyedEvaluator::new()));
    round.submit_guess(&right_answer(0)).unwrap();
    let Some(GameEvent::VerdictReceived { result, .. }) = rx.recv().await else {
        panic!("expected verdict event");
    };
    round.apply_verdict(result).unwrap();
    assert!(round.expiry_pending());

    drop(round);
    tokio::time::sleep(DELAY * 2).await;
    assert!(rx.try_recv().is_err());
}
