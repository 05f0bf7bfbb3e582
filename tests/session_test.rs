//! Session scenarios driven through fake question sources and evaluators.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use common::*;
use globetrotter::{
    GameError, GameEvent, Generation, RoundPhase, ServiceErrorKind, SessionStatus, SessionUpdate,
    Verdict,
};

#[tokio::test(start_paused = true)]
async fn test_ten_correct_answers_reach_perfect_score() {
    let mut session = session_with(
        Arc::new(ScriptedSource::always(sample_questions(10))),
        Arc::new(KeyedEvaluator::new()),
    );
    session.start();
    assert!(session.is_loading());
    assert!(matches!(
        next(&mut session).await,
        SessionUpdate::Started { total: 10 }
    ));

    for i in 0..10 {
        assert_eq!(session.state().question_number(), i + 1);
        session.submit_guess(&right_answer(i)).unwrap();
        match next(&mut session).await {
            SessionUpdate::RoundResolved { correct, fact } => {
                assert!(correct);
                assert_eq!(fact, format!("Fact about q{}", i));
            }
            other => panic!("expected resolution, got {:?}", other),
        }
        assert_tally_invariant(&session);

        let update = next(&mut session).await;
        if i < 9 {
            assert!(matches!(update, SessionUpdate::Advanced { index } if index == i + 1));
        } else {
            assert!(matches!(update, SessionUpdate::GameOver));
        }
        assert_tally_invariant(&session);
    }

    let state = session.state();
    assert_eq!(*state.score(), 100);
    assert_eq!(*state.correct(), 10);
    assert_eq!(*state.incorrect(), 0);
    assert!(*state.game_over());
    assert!(matches!(session.status(), SessionStatus::GameOver));

    let summary = session.summary("https://example.com").unwrap();
    assert!(*summary.is_perfect());
    assert_eq!(*summary.total_possible(), 100);
    assert!(summary.message().contains("aced all 10 questions"));
}

#[tokio::test(start_paused = true)]
async fn test_mixed_answers_score_only_correct_ones() {
    let mut session = session_with(
        Arc::new(ScriptedSource::always(sample_questions(3))),
        Arc::new(KeyedEvaluator::new()),
    );
    session.start();
    next(&mut session).await;

    for (i, guess) in [right_answer(0), wrong_answer(1), right_answer(2)]
        .iter()
        .enumerate()
    {
        session.submit_guess(guess).unwrap();
        let resolved = next(&mut session).await;
        assert!(matches!(resolved, SessionUpdate::RoundResolved { correct, .. } if correct == (i != 1)));
        next(&mut session).await;
    }

    let state = session.state();
    assert_eq!(*state.score(), 20);
    assert_eq!(*state.correct(), 2);
    assert_eq!(*state.incorrect(), 1);

    let summary = session.summary("https://example.com").unwrap();
    assert!(!*summary.is_perfect());
    assert_eq!(
        summary.message(),
        "I scored 20 points in Globetrotter! Try to beat me: https://example.com"
    );
}

#[tokio::test(start_paused = true)]
async fn test_empty_batch_ends_game_without_a_round() {
    let mut session = session_with(
        Arc::new(ScriptedSource::new(vec![Ok(Vec::new())])),
        Arc::new(KeyedEvaluator::new()),
    );
    session.start();
    assert!(matches!(next(&mut session).await, SessionUpdate::GameOver));
    assert!(session.round().is_none());
    assert!(*session.state().game_over());
    assert_eq!(*session.state().total(), 0);
    assert!(matches!(
        session.submit_guess("anything"),
        Err(GameError::NoActiveRound)
    ));

    let summary = session.summary("https://example.com").unwrap();
    assert!(!*summary.is_perfect());
    assert_eq!(*summary.score(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_check_returns_round_to_idle_without_scoring() {
    let evaluator = Arc::new(KeyedEvaluator::failing_first(1));
    let mut session = session_with(
        Arc::new(ScriptedSource::always(sample_questions(2))),
        evaluator.clone(),
    );
    session.start();
    next(&mut session).await;

    session.submit_guess(&right_answer(0)).unwrap();
    match next(&mut session).await {
        SessionUpdate::CheckFailed(e) => assert_eq!(e.kind(), ServiceErrorKind::Network),
        other => panic!("expected check failure, got {:?}", other),
    }
    let round = session.round().unwrap();
    assert_eq!(round.phase(), RoundPhase::Idle);
    assert!(round.selected().is_none());
    assert!(round.last_error().is_some());
    assert!(!round.expiry_pending());
    assert_eq!(*session.state().score(), 0);
    assert_eq!(session.state().answered(), 0);

    session.submit_guess(&right_answer(0)).unwrap();
    assert!(matches!(
        next(&mut session).await,
        SessionUpdate::RoundResolved { correct: true, .. }
    ));
    assert_eq!(*session.state().score(), 10);
    assert_eq!(evaluator.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_second_guess_while_checking_is_rejected() {
    let evaluator = Arc::new(GatedEvaluator::new());
    let mut session = session_with(
        Arc::new(ScriptedSource::always(sample_questions(2))),
        evaluator.clone(),
    );
    session.start();
    next(&mut session).await;

    session.submit_guess(&wrong_answer(0)).unwrap();
    assert!(matches!(
        session.submit_guess(&right_answer(0)),
        Err(GameError::InvalidTransition(RoundPhase::Checking))
    ));
    assert_eq!(session.round().unwrap().selected(), Some(wrong_answer(0).as_str()));

    evaluator.open();
    assert!(matches!(
        next(&mut session).await,
        SessionUpdate::RoundResolved { correct: false, .. }
    ));
    assert!(matches!(
        session.submit_guess(&right_answer(0)),
        Err(GameError::InvalidTransition(RoundPhase::ResolvedIncorrect))
    ));
    assert_eq!(session.state().answered(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_option_is_rejected() {
    let mut session = session_with(
        Arc::new(ScriptedSource::always(sample_questions(1))),
        Arc::new(KeyedEvaluator::new()),
    );
    session.start();
    next(&mut session).await;

    assert!(matches!(
        session.submit_guess("Atlantis"),
        Err(GameError::UnknownOption(_))
    ));
    assert!(matches!(
        session.submit_option(7),
        Err(GameError::UnknownOption(_))
    ));
    assert_eq!(session.round().unwrap().phase(), RoundPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_restart_while_checking_discards_late_verdict() {
    let evaluator = Arc::new(GatedEvaluator::new());
    let mut session = session_with(
        Arc::new(ScriptedSource::always(sample_questions(3))),
        evaluator.clone(),
    );
    session.start();
    next(&mut session).await;

    session.submit_guess(&right_answer(0)).unwrap();
    let old_generation = session.round().unwrap().generation();

    session.restart();
    assert!(session.is_loading());
    assert!(session.round().is_none());
    assert!(matches!(
        next(&mut session).await,
        SessionUpdate::Started { total: 3 }
    ));
    let new_generation = session.round().unwrap().generation();
    assert!(new_generation > old_generation);

    // A verdict for the discarded round arrives after the restart.
    let update = session.handle_event(GameEvent::VerdictReceived {
        generation: old_generation,
        result: Ok(Verdict::new(true, "late".to_string())),
    });
    assert!(matches!(update, SessionUpdate::Stale { generation } if generation == old_generation));

    let state = session.state();
    assert_eq!(*state.score(), 0);
    assert_eq!(*state.index(), 0);
    assert_eq!(state.answered(), 0);
    assert_eq!(session.round().unwrap().phase(), RoundPhase::Idle);

    let update = session.handle_event(GameEvent::RoundExpired {
        generation: old_generation,
    });
    assert!(matches!(update, SessionUpdate::Stale { .. }));
    assert_eq!(*session.state().index(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_superseded_load_is_dropped() {
    let source = Arc::new(ScriptedSource::new(vec![
        Ok(sample_questions(5)),
        Ok(sample_questions(2)),
    ]));
    let mut session = session_with(source.clone(), Arc::new(KeyedEvaluator::new()));
    session.start();
    session.restart();

    let update = session.handle_event(GameEvent::QuestionsLoaded {
        generation: Generation::default(),
        result: Ok(sample_questions(9)),
    });
    assert!(matches!(update, SessionUpdate::Stale { .. }));
    assert!(session.is_loading());

    match next(&mut session).await {
        SessionUpdate::Started { total } => assert!(total == 5 || total == 2),
        other => panic!("expected start, got {:?}", other),
    }
    assert!(matches!(session.status(), SessionStatus::Playing));
}

#[tokio::test(start_paused = true)]
async fn test_round_resolves_at_most_once() {
    let mut session = session_with(
        Arc::new(ScriptedSource::always(sample_questions(2))),
        Arc::new(KeyedEvaluator::new()),
    );
    session.start();
    next(&mut session).await;

    session.submit_guess(&right_answer(0)).unwrap();
    next(&mut session).await;
    let generation = session.round().unwrap().generation();
    assert_eq!(*session.state().score(), 10);

    assert!(matches!(
        session.on_round_resolved(generation, true),
        Err(GameError::AlreadyResolved(g)) if g == generation
    ));
    assert_eq!(*session.state().score(), 10);
    assert_eq!(*session.state().correct(), 1);

    let duplicate = session.handle_event(GameEvent::VerdictReceived {
        generation,
        result: Ok(Verdict::new(true, "again".to_string())),
    });
    assert!(matches!(
        duplicate,
        SessionUpdate::Rejected(GameError::InvalidTransition(RoundPhase::ResolvedCorrect))
    ));
    assert_eq!(*session.state().score(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_resolution_needs_live_resolved_round() {
    let mut session = session_with(
        Arc::new(ScriptedSource::always(sample_questions(3))),
        Arc::new(KeyedEvaluator::new()),
    );
    session.start();
    next(&mut session).await;
    let generation = session.round().unwrap().generation();

    assert!(matches!(
        session.on_round_resolved(generation, true),
        Err(GameError::InvalidTransition(RoundPhase::Idle))
    ));
    assert!(matches!(
        session.on_round_resolved(generation.next(), true),
        Err(GameError::NotLiveRound(g)) if g == generation.next()
    ));
    assert_eq!(*session.state().score(), 0);
    assert_eq!(session.state().answered(), 0);
    assert_tally_invariant(&session);

    // The genuine verdict for the live round is still credited.
    session.submit_guess(&right_answer(0)).unwrap();
    assert!(matches!(
        next(&mut session).await,
        SessionUpdate::RoundResolved { correct: true, .. }
    ));
    assert_eq!(*session.state().score(), 10);
    assert_eq!(*session.state().correct(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_restart_while_resolved_cancels_expiry() {
    let mut session = session_with(
        Arc::new(ScriptedSource::always(sample_questions(3))),
        Arc::new(KeyedEvaluator::new()),
    );
    session.start();
    next(&mut session).await;

    session.submit_guess(&right_answer(0)).unwrap();
    assert!(matches!(
        next(&mut session).await,
        SessionUpdate::RoundResolved { correct: true, .. }
    ));
    assert!(session.round().unwrap().expiry_pending());

    session.restart();
    assert!(matches!(
        next(&mut session).await,
        SessionUpdate::Started { total: 3 }
    ));
    let generation = session.round().unwrap().generation();

    tokio::time::sleep(*session.rules().expiry_delay() + Duration::from_secs(3)).await;
    let updates = session.pump();
    assert!(
        updates
            .iter()
            .all(|u| matches!(u, SessionUpdate::Stale { .. })),
        "unexpected updates after restart: {:?}",
        updates
    );

    let state = session.state();
    assert_eq!(*state.index(), 0);
    assert_eq!(*state.score(), 0);
    assert!(matches!(session.status(), SessionStatus::Playing));
    let round = session.round().unwrap();
    assert_eq!(round.generation(), generation);
    assert_eq!(round.phase(), RoundPhase::Idle);
    assert!(!round.is_finished());
}

#[tokio::test(start_paused = true)]
async fn test_failed_load_can_be_retried() {
    let questions = sample_questions(4);
    let source = Arc::new(ScriptedSource::new(vec![
        Err(network_error()),
        Ok(questions),
    ]));
    let mut session = session_with(source.clone(), Arc::new(KeyedEvaluator::new()));

    session.start();
    assert!(matches!(next(&mut session).await, SessionUpdate::LoadFailed(_)));
    assert!(matches!(session.status(), SessionStatus::LoadFailed(_)));
    assert!(session.round().is_none());

    session.start();
    assert!(matches!(
        next(&mut session).await,
        SessionUpdate::Started { total: 4 }
    ));
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    assert_eq!(session.state().remaining(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_game_over_resets_state() {
    let mut session = session_with(
        Arc::new(ScriptedSource::always(sample_questions(1))),
        Arc::new(KeyedEvaluator::new()),
    );
    session.start();
    next(&mut session).await;
    session.submit_guess(&right_answer(0)).unwrap();
    next(&mut session).await;
    assert!(matches!(next(&mut session).await, SessionUpdate::GameOver));
    assert_eq!(*session.state().index(), 0);

    session.restart();
    assert!(!*session.state().game_over());
    assert_eq!(*session.state().score(), 0);
    assert!(session.summary("https://example.com").is_none());
    assert!(matches!(
        next(&mut session).await,
        SessionUpdate::Started { total: 1 }
    ));
}
