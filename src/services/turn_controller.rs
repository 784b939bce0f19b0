//! Turn controller: the per-submission state machine.
//!
//! ```text
//! AwaitingAnswer -> Validating -> Retrying -> AwaitingAnswer
//!                            \-> Scoring -> GeneratingNext -> AwaitingAnswer
//!                                       \-> Closing -> Completed
//! ```
//!
//! Nothing is committed until every external call for the submission has
//! succeeded. A failed call rolls the status back to `AwaitingAnswer` and
//! leaves the transcript, history and retry flag untouched, so the caller
//! can resubmit the same answer.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::retry_policy::{RetryDecision, RetryPolicy};
use super::with_deadline;
use crate::domain::errors::{InterviewError, InterviewResult};
use crate::domain::models::{
    Config, ScoreHistoryEntry, SessionState, SessionStatus, TraitKind, Turn,
    DEFAULT_CLOSING_MESSAGE, DEFAULT_OPENING_QUESTION,
};
use crate::domain::ports::{
    Collaborators, QuestionGenerator, QuestionRequest, ScoreAssessment, ScoringRequest,
    TraitScorer,
};

/// Settings for the turn controller.
#[derive(Debug, Clone)]
pub struct TurnControllerConfig {
    /// Accepted answers before the session closes.
    pub max_turns: usize,
    /// Fixed first question.
    pub opening_question: String,
    /// Appended as the final assistant turn.
    pub closing_message: String,
    /// Deadline for each external call.
    pub call_timeout: Duration,
}

impl Default for TurnControllerConfig {
    fn default() -> Self {
        Self {
            max_turns: 5,
            opening_question: DEFAULT_OPENING_QUESTION.to_string(),
            closing_message: DEFAULT_CLOSING_MESSAGE.to_string(),
            call_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&Config> for TurnControllerConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_turns: config.interview.max_turns,
            opening_question: config.interview.opening_question.clone(),
            closing_message: config.interview.closing_message.clone(),
            call_timeout: Duration::from_millis(config.collaborators.timeout_ms),
        }
    }
}

/// What a processed submission did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Answer rejected; a retry prompt was appended.
    RetryRequested { reason: String },
    /// Answer committed and the next question appended.
    Advanced { low_confidence: bool },
    /// Final answer committed and the session closed.
    Completed { low_confidence: bool },
}

/// Orchestrates validation, scoring and question generation for one session at a time.
pub struct TurnController {
    retry_policy: RetryPolicy,
    generator: Arc<dyn QuestionGenerator>,
    scorer: Arc<dyn TraitScorer>,
    config: TurnControllerConfig,
}

impl TurnController {
    pub fn new(collaborators: Collaborators, config: TurnControllerConfig) -> Self {
        Self {
            retry_policy: RetryPolicy::new(collaborators.validator, config.call_timeout),
            generator: collaborators.generator,
            scorer: collaborators.scorer,
            config,
        }
    }

    pub const fn config(&self) -> &TurnControllerConfig {
        &self.config
    }

    /// Start a session. The opening question is fixed and never generated.
    pub fn start_session(&self) -> SessionState {
        let state = SessionState::new(self.config.opening_question.clone(), self.config.max_turns);
        info!(session_id = %state.session_id, "interview session started");
        state
    }

    /// Process one submitted answer.
    ///
    /// The caller must hold the session's serialization lock for the whole call.
    /// `cancel` is honoured only before each external call is issued.
    #[instrument(
        skip(self, state, answer, cancel),
        fields(session_id = %state.session_id, accepted = state.accepted_turn_count()),
        err
    )]
    pub async fn submit(
        &self,
        state: &mut SessionState,
        answer: &str,
        cancel: &CancellationToken,
    ) -> InterviewResult<TurnOutcome> {
        // 1. Gate on status
        if state.is_completed() {
            return Err(InterviewError::session_state(
                state.session_id,
                "interview already completed",
            ));
        }
        if state.status != SessionStatus::AwaitingAnswer {
            return Err(InterviewError::session_state(
                state.session_id,
                format!("a submission is already in progress ({:?})", state.status),
            ));
        }

        // 2. Input checks, no state change
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(InterviewError::Input("answer must not be empty".to_string()));
        }
        let question = state
            .transcript
            .last_assistant_turn()
            .map(|turn| turn.content.clone())
            .ok_or_else(|| InterviewError::Internal("session has no active question".into()))?;

        if cancel.is_cancelled() {
            return Err(InterviewError::Cancelled);
        }

        // 3. Validate
        state.transition(SessionStatus::Validating)?;
        let retry_attempts = u32::from(state.retry_pending);
        let decision = match self
            .retry_policy
            .evaluate(&question, answer, retry_attempts)
            .await
        {
            Ok(decision) => decision,
            Err(e) => {
                Self::rollback(state);
                return Err(InterviewError::Validation(e.to_string()));
            }
        };

        if let RetryDecision::Retry { reason } = decision {
            return Self::request_retry(state, answer, reason);
        }

        // 4. Score, and generate the next question unless this answer closes the session
        if cancel.is_cancelled() {
            Self::rollback(state);
            return Err(InterviewError::Cancelled);
        }
        state.transition(SessionStatus::Scoring)?;

        let answer_turn = Turn::user(answer);
        let briefing = state.transcript.with_pending(answer_turn.clone());
        let committed_after = state.accepted_turn_count() + 1;
        let closing = committed_after >= state.max_turns;

        let (assessment, next_question) = if closing {
            (self.score(&briefing).await, Ok(None))
        } else {
            let request = QuestionRequest {
                transcript: briefing.clone(),
                question_number: committed_after + 1,
                max_questions: state.max_turns,
            };
            let (assessment, question) =
                tokio::join!(self.score(&briefing), self.generate(&request));
            (assessment, question.map(Some))
        };

        let (assessment, next_question) = match (assessment, next_question) {
            (Ok(assessment), Ok(next_question)) => (assessment, next_question),
            (Err(e), _) | (_, Err(e)) => {
                Self::rollback(state);
                return Err(e);
            }
        };

        // 5. Commit
        let low_confidence = decision.is_low_confidence();
        let turn_index = state.transcript.len();
        let related_factors = related_factors(&assessment);
        let aggregate = state.scores.record(ScoreHistoryEntry::new(
            turn_index,
            answer,
            related_factors,
            assessment.score,
            low_confidence,
        ));
        state.transcript.append(answer_turn);
        state.retry_pending = false;
        debug!(?aggregate, low_confidence, "answer committed");

        if let Some(question) = next_question {
            state.transition(SessionStatus::GeneratingNext)?;
            state.transcript.append(Turn::assistant(question));
            state.transition(SessionStatus::AwaitingAnswer)?;
            Ok(TurnOutcome::Advanced { low_confidence })
        } else {
            state.transition(SessionStatus::Closing)?;
            state
                .transcript
                .append(Turn::assistant(self.config.closing_message.clone()));
            state.transition(SessionStatus::Completed)?;
            info!(
                accepted = state.accepted_turn_count(),
                "interview session completed"
            );
            Ok(TurnOutcome::Completed { low_confidence })
        }
    }

    fn request_retry(
        state: &mut SessionState,
        answer: &str,
        reason: String,
    ) -> InterviewResult<TurnOutcome> {
        state.transition(SessionStatus::Retrying)?;
        state.transcript.append(Turn::user(answer));
        state
            .transcript
            .append(Turn::retry_prompt(retry_prompt_text(&reason)));
        state.retry_pending = true;
        state.transition(SessionStatus::AwaitingAnswer)?;
        debug!(%reason, "retry requested");
        Ok(TurnOutcome::RetryRequested { reason })
    }

    async fn score(&self, transcript: &[Turn]) -> InterviewResult<ScoreAssessment> {
        let request = ScoringRequest {
            transcript: transcript.to_vec(),
        };
        with_deadline(self.config.call_timeout, self.scorer.score(&request))
            .await
            .map_err(|e| InterviewError::Scoring(e.to_string()))
    }

    async fn generate(&self, request: &QuestionRequest) -> InterviewResult<String> {
        let generated = with_deadline(self.config.call_timeout, self.generator.generate(request))
            .await
            .map_err(|e| InterviewError::Generation(e.to_string()))?;

        let question = generated.question_text.trim();
        if question.is_empty() {
            return Err(InterviewError::Generation(
                "generator returned an empty question".to_string(),
            ));
        }
        Ok(question.to_string())
    }

    fn rollback(state: &mut SessionState) {
        if let Err(e) = state.transition(SessionStatus::AwaitingAnswer) {
            error!(error = %e, "failed to roll back session status");
        }
    }
}

fn retry_prompt_text(reason: &str) -> String {
    format!("I couldn't use that answer: {reason} Could you answer the question again in more detail?")
}

/// Related factors named by the scorer, or the non-zero traits when it named none.
fn related_factors(assessment: &ScoreAssessment) -> BTreeSet<TraitKind> {
    match &assessment.related_factors {
        None => assessment.score.nonzero_traits(),
        Some(names) => names
            .iter()
            .filter_map(|name| match name.parse::<TraitKind>() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    warn!(error = %e, "ignoring unknown related factor");
                    None
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockAnswerValidator, MockQuestionGenerator, MockTraitScorer};
    use crate::domain::models::TraitScore;
    use crate::domain::ports::{CollaboratorError, ValidationVerdict};

    struct Harness {
        validator: Arc<MockAnswerValidator>,
        generator: Arc<MockQuestionGenerator>,
        scorer: Arc<MockTraitScorer>,
        controller: TurnController,
    }

    fn harness(max_turns: usize) -> Harness {
        let validator = Arc::new(MockAnswerValidator::with_min_answer_chars(3));
        let generator = Arc::new(MockQuestionGenerator::new());
        let scorer = Arc::new(MockTraitScorer::new());
        let controller = TurnController::new(
            Collaborators::new(validator.clone(), generator.clone(), scorer.clone()),
            TurnControllerConfig {
                max_turns,
                ..TurnControllerConfig::default()
            },
        );
        Harness {
            validator,
            generator,
            scorer,
            controller,
        }
    }

    #[tokio::test]
    async fn test_accepted_answer_advances() {
        let h = harness(5);
        let mut state = h.controller.start_session();
        let cancel = CancellationToken::new();

        let outcome = h
            .controller
            .submit(&mut state, "I ran a marathon after two injuries", &cancel)
            .await
            .unwrap();

        assert_eq!(outcome, TurnOutcome::Advanced { low_confidence: false });
        assert_eq!(state.status, SessionStatus::AwaitingAnswer);
        assert_eq!(state.accepted_turn_count(), 1);
        assert_eq!(state.transcript.len(), 3);
        assert_eq!(state.history()[0].turn_index, 1);
        assert_eq!(h.generator.call_count(), 1);
        assert_eq!(h.scorer.call_count(), 1);
    }

    #[tokio::test]
    async fn test_rejection_then_force_accept() {
        let h = harness(5);
        let mut state = h.controller.start_session();
        let cancel = CancellationToken::new();

        let first = h.controller.submit(&mut state, "no", &cancel).await.unwrap();
        assert!(matches!(first, TurnOutcome::RetryRequested { .. }));
        assert!(state.retry_pending);
        assert_eq!(state.accepted_turn_count(), 0);
        assert!(state.transcript.turns().last().unwrap().is_retry_prompt);
        assert_eq!(h.scorer.call_count(), 0);

        let second = h.controller.submit(&mut state, "eh", &cancel).await.unwrap();
        assert_eq!(second, TurnOutcome::Advanced { low_confidence: true });
        assert!(!state.retry_pending);
        assert_eq!(state.accepted_turn_count(), 1);
        assert!(state.history()[0].low_confidence);
    }

    #[tokio::test]
    async fn test_scoring_failure_commits_nothing() {
        let h = harness(5);
        let mut state = h.controller.start_session();
        let cancel = CancellationToken::new();
        h.scorer
            .push_assessment(Err(CollaboratorError::Unavailable("503".into())))
            .await;

        let err = h
            .controller
            .submit(&mut state, "A long enough answer", &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, InterviewError::Scoring(_)));
        assert!(err.is_recoverable());
        assert_eq!(state.status, SessionStatus::AwaitingAnswer);
        assert_eq!(state.accepted_turn_count(), 0);
        assert_eq!(state.transcript.len(), 1);
    }

    #[tokio::test]
    async fn test_generation_failure_commits_nothing() {
        let h = harness(5);
        let mut state = h.controller.start_session();
        let cancel = CancellationToken::new();
        h.generator
            .push_question(Err(CollaboratorError::Timeout(5)))
            .await;

        let err = h
            .controller
            .submit(&mut state, "A long enough answer", &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, InterviewError::Generation(_)));
        assert_eq!(state.accepted_turn_count(), 0);
        assert_eq!(state.status, SessionStatus::AwaitingAnswer);
    }

    #[tokio::test]
    async fn test_validator_failure_preserves_retry_flag() {
        let h = harness(5);
        let mut state = h.controller.start_session();
        let cancel = CancellationToken::new();
        h.controller.submit(&mut state, "no", &cancel).await.unwrap();
        h.validator
            .push_verdict(Err(CollaboratorError::Transport("reset".into())))
            .await;

        let err = h
            .controller
            .submit(&mut state, "A real answer", &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, InterviewError::Validation(_)));
        assert!(state.retry_pending);
        assert_eq!(state.status, SessionStatus::AwaitingAnswer);
    }

    #[tokio::test]
    async fn test_last_answer_closes_without_generation() {
        let h = harness(1);
        let mut state = h.controller.start_session();
        let cancel = CancellationToken::new();

        let outcome = h
            .controller
            .submit(&mut state, "The only answer", &cancel)
            .await
            .unwrap();

        assert_eq!(outcome, TurnOutcome::Completed { low_confidence: false });
        assert_eq!(state.status, SessionStatus::Completed);
        assert_eq!(h.generator.call_count(), 0);
        assert_eq!(
            state.transcript.turns().last().unwrap().content,
            DEFAULT_CLOSING_MESSAGE
        );

        let err = h
            .controller
            .submit(&mut state, "One more thing", &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, InterviewError::SessionState { .. }));
        assert_eq!(state.accepted_turn_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_answer_is_input_error() {
        let h = harness(5);
        let mut state = h.controller.start_session();

        let err = h
            .controller
            .submit(&mut state, "  \n\t ", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, InterviewError::Input(_)));
        assert_eq!(h.validator.call_count(), 0);
        assert_eq!(state.transcript.len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_validation() {
        let h = harness(5);
        let mut state = h.controller.start_session();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = h
            .controller
            .submit(&mut state, "A long enough answer", &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, InterviewError::Cancelled));
        assert_eq!(h.validator.call_count(), 0);
        assert_eq!(state.status, SessionStatus::AwaitingAnswer);
    }

    #[tokio::test]
    async fn test_scorer_factors_are_normalized() {
        let h = harness(5);
        let mut state = h.controller.start_session();
        h.scorer
            .push_assessment(Ok(ScoreAssessment {
                score: TraitScore::new(4, 0, 2, 0).unwrap(),
                related_factors: Some(vec![
                    "Perseverance".into(),
                    "goal orientation".into(),
                    "curiosity".into(),
                ]),
            }))
            .await;

        h.controller
            .submit(&mut state, "A long enough answer", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            state.history()[0].related_factors,
            BTreeSet::from([TraitKind::Perseverance, TraitKind::GoalOrientation])
        );
    }

    #[tokio::test]
    async fn test_slow_scorer_times_out() {
        let validator = Arc::new(MockAnswerValidator::with_min_answer_chars(1));
        let scorer = Arc::new(MockTraitScorer::new().with_delay(Duration::from_millis(200)));
        let controller = TurnController::new(
            Collaborators::new(validator, Arc::new(MockQuestionGenerator::new()), scorer),
            TurnControllerConfig {
                call_timeout: Duration::from_millis(20),
                ..TurnControllerConfig::default()
            },
        );
        let mut state = controller.start_session();

        let err = controller
            .submit(&mut state, "answer", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, InterviewError::Scoring(ref msg) if msg.contains("timed out")));
        assert_eq!(state.accepted_turn_count(), 0);
    }

    #[tokio::test]
    async fn test_explicit_valid_verdict_skips_retry() {
        let h = harness(5);
        let mut state = h.controller.start_session();
        h.validator
            .push_verdict(Ok(ValidationVerdict::accepted()))
            .await;

        let outcome = h
            .controller
            .submit(&mut state, "ok", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome, TurnOutcome::Advanced { low_confidence: false });
    }
}
