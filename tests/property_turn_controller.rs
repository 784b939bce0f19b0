mod common;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use common::{Fixture, GOOD_ANSWER, POOR_ANSWER};
use grit_interview::domain::ports::CollaboratorError;
use grit_interview::services::TurnOutcome;
use grit_interview::{SessionStatus, TraitKind, TraitScore};

/// One scripted submission.
#[derive(Debug, Clone)]
enum Step {
    Good,
    Poor,
    ScorerDown,
    GeneratorDown,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => Just(Step::Good),
        3 => Just(Step::Poor),
        1 => Just(Step::ScorerDown),
        1 => Just(Step::GeneratorDown),
    ]
}

fn trait_score() -> impl Strategy<Value = TraitScore> {
    (0i64..=5, 0i64..=5, 0i64..=5, 0i64..=5)
        .prop_map(|(a, b, c, d)| TraitScore::new(a, b, c, d).unwrap())
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

proptest! {
    /// Property: progress and retry bounds
    ///
    /// Each submission adds at most one accepted turn, history always matches
    /// the accepted count, and no question is rejected more than once.
    #[test]
    fn prop_progress_and_retry_bounds(
        steps in prop::collection::vec(step(), 1..25),
        scores in prop::collection::vec(trait_score(), 25),
        max_turns in 1usize..8,
    ) {
        runtime().block_on(async {
            let fixture = Fixture::with_timeout(max_turns, Duration::from_secs(1));
            let mut state = fixture.controller.start_session();
            let cancel = CancellationToken::new();
            let mut consecutive_retries = 0;

            for (i, step) in steps.iter().enumerate() {
                let answer = match step {
                    Step::Poor => POOR_ANSWER,
                    _ => GOOD_ANSWER,
                };
                match step {
                    Step::ScorerDown => {
                        fixture.scorer
                            .push_assessment(Err(CollaboratorError::Unavailable("down".into())))
                            .await;
                    }
                    Step::GeneratorDown => {
                        fixture.generator
                            .push_question(Err(CollaboratorError::Timeout(10)))
                            .await;
                    }
                    Step::Good | Step::Poor => fixture.scorer.push_score(scores[i]).await,
                }

                let before = state.accepted_turn_count();
                let was_completed = state.is_completed();
                let result = fixture.controller.submit(&mut state, answer, &cancel).await;
                let after = state.accepted_turn_count();

                prop_assert!(after == before || after == before + 1);
                prop_assert_eq!(after, state.history().len());
                prop_assert!(after <= max_turns);

                if was_completed {
                    prop_assert!(result.is_err());
                    prop_assert_eq!(after, before);
                    continue;
                }

                match result {
                    Ok(TurnOutcome::RetryRequested { .. }) => {
                        consecutive_retries += 1;
                        prop_assert!(consecutive_retries <= 1, "question retried twice");
                        prop_assert_eq!(after, before);
                    }
                    Ok(_) => {
                        consecutive_retries = 0;
                        prop_assert_eq!(after, before + 1);
                    }
                    Err(e) => {
                        prop_assert!(e.is_recoverable(), "unexpected error: {}", e);
                        prop_assert_eq!(after, before);
                        prop_assert_eq!(state.status, SessionStatus::AwaitingAnswer);
                    }
                }

                // Scripts for collaborators that were never reached must not leak
                // into later steps.
                fixture.scorer.clear_script().await;
                fixture.generator.clear_script().await;

                prop_assert_eq!(
                    state.status == SessionStatus::Completed,
                    after == max_turns
                );
            }
            Ok::<(), TestCaseError>(())
        })?;
    }

    /// Property: aggregate stays within [0, 5] and equals the per-trait mean
    #[test]
    fn prop_aggregate_bounded_mean(
        scores in prop::collection::vec(trait_score(), 1..=10),
    ) {
        runtime().block_on(async {
            let fixture = Fixture::new(scores.len());
            let mut state = fixture.controller.start_session();
            let cancel = CancellationToken::new();

            for score in &scores {
                fixture.scorer.push_score(*score).await;
                fixture.controller
                    .submit(&mut state, GOOD_ANSWER, &cancel)
                    .await
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;

                let aggregate = state.aggregate();
                for kind in TraitKind::ALL {
                    let value = aggregate.get(kind);
                    prop_assert!((0.0..=5.0).contains(&value), "{} = {}", kind, value);
                }
            }

            let aggregate = state.aggregate();
            #[allow(clippy::cast_precision_loss)]
            let count = scores.len() as f64;
            for kind in TraitKind::ALL {
                let expected = scores.iter().map(|s| f64::from(s.get(kind))).sum::<f64>() / count;
                prop_assert!((aggregate.get(kind) - expected).abs() < 1e-9);
            }
            prop_assert_eq!(state.status, SessionStatus::Completed);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
