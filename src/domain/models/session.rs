//! Domain models for interview sessions.
//!
//! A session owns its transcript and score history, and moves through a
//! fixed set of statuses while a submission is processed. `Completed` is
//! terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregator::ScoreAggregator;
use super::score::{ScoreHistoryEntry, TraitAggregate};
use super::turn::{Transcript, Turn};
use crate::domain::errors::{InterviewError, InterviewResult};

/// Turn controller status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    /// Waiting for an answer to the active question
    AwaitingAnswer,
    /// Answer is being checked by the validator
    Validating,
    /// Answer was rejected; a retry prompt is being appended
    Retrying,
    /// Answer accepted; scoring (and next-question generation) in flight
    Scoring,
    /// Scores committed; next question being appended
    GeneratingNext,
    /// Final answer committed; closing message being appended
    Closing,
    /// Interview finished, no further submissions accepted
    Completed,
}

impl SessionStatus {
    /// Whether `self -> next` is an edge of the turn state machine.
    ///
    /// The `-> AwaitingAnswer` edges out of `Validating` and `Scoring` are the
    /// rollback paths taken when an external call fails.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::AwaitingAnswer, Self::Validating)
                | (
                    Self::Validating,
                    Self::Retrying | Self::Scoring | Self::AwaitingAnswer
                )
                | (Self::Retrying | Self::GeneratingNext, Self::AwaitingAnswer)
                | (
                    Self::Scoring,
                    Self::GeneratingNext | Self::Closing | Self::AwaitingAnswer
                )
                | (Self::Closing, Self::Completed)
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Server-owned interview state.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: Uuid,
    pub transcript: Transcript,
    pub scores: ScoreAggregator,
    /// True once the active question has had its one retry.
    pub retry_pending: bool,
    pub status: SessionStatus,
    pub max_turns: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    /// Creates a session whose transcript starts with the fixed opening question.
    pub fn new(opening_question: impl Into<String>, max_turns: usize) -> Self {
        let now = Utc::now();
        let mut transcript = Transcript::new();
        transcript.append(Turn::assistant(opening_question));

        Self {
            session_id: Uuid::new_v4(),
            transcript,
            scores: ScoreAggregator::new(),
            retry_pending: false,
            status: SessionStatus::AwaitingAnswer,
            max_turns,
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of accepted answers; always equal to the history length.
    pub fn accepted_turn_count(&self) -> usize {
        self.scores.len()
    }

    pub fn history(&self) -> &[ScoreHistoryEntry] {
        self.scores.history()
    }

    pub fn aggregate(&self) -> TraitAggregate {
        self.scores.aggregate()
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Moves to `next`, rejecting edges outside the state machine.
    pub fn transition(&mut self, next: SessionStatus) -> InterviewResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(InterviewError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(self)
    }
}

/// Serializable view of a session returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub transcript: Vec<Turn>,
    pub accepted_turn_count: usize,
    pub max_turns: usize,
    pub retry_pending: bool,
    /// Per-trait mean, rounded to one decimal place.
    pub aggregate: TraitAggregate,
    /// Aggregate change caused by the latest accepted answer.
    pub last_delta: Option<TraitAggregate>,
    pub history: Vec<ScoreHistoryEntry>,
    pub active_question: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&SessionState> for SessionSnapshot {
    fn from(state: &SessionState) -> Self {
        let active_question = if state.is_completed() {
            None
        } else {
            state
                .transcript
                .last_assistant_turn()
                .map(|turn| turn.content.clone())
        };

        Self {
            session_id: state.session_id,
            status: state.status,
            transcript: state.transcript.turns().to_vec(),
            accepted_turn_count: state.accepted_turn_count(),
            max_turns: state.max_turns,
            retry_pending: state.retry_pending,
            aggregate: state.scores.display_aggregate(),
            last_delta: state.scores.last_delta().map(TraitAggregate::rounded),
            history: state.history().to_vec(),
            active_question,
            created_at: state.created_at,
            updated_at: state.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_asks_opening_question() {
        let state = SessionState::new("Tell me about a long project.", 5);

        assert_eq!(state.status, SessionStatus::AwaitingAnswer);
        assert_eq!(state.accepted_turn_count(), 0);
        assert!(!state.retry_pending);
        assert_eq!(state.transcript.len(), 1);
        assert_eq!(
            state.transcript.last_assistant_turn().unwrap().content,
            "Tell me about a long project."
        );
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut state = SessionState::new("Q", 5);
        state.transition(SessionStatus::Validating).unwrap();
        state.transition(SessionStatus::Scoring).unwrap();
        state.transition(SessionStatus::GeneratingNext).unwrap();
        state.transition(SessionStatus::AwaitingAnswer).unwrap();
        state.transition(SessionStatus::Validating).unwrap();
        state.transition(SessionStatus::Retrying).unwrap();
        state.transition(SessionStatus::AwaitingAnswer).unwrap();
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut state = SessionState::new("Q", 1);
        state.transition(SessionStatus::Validating).unwrap();
        state.transition(SessionStatus::Scoring).unwrap();
        state.transition(SessionStatus::Closing).unwrap();
        state.transition(SessionStatus::Completed).unwrap();

        for next in [
            SessionStatus::AwaitingAnswer,
            SessionStatus::Validating,
            SessionStatus::Scoring,
        ] {
            let err = state.transition(next).unwrap_err();
            assert!(matches!(err, InterviewError::InvalidTransition { .. }));
        }
        assert!(state.is_completed());
    }

    #[test]
    fn test_skipping_validation_is_rejected() {
        let mut state = SessionState::new("Q", 5);
        assert!(state.transition(SessionStatus::Scoring).is_err());
        assert_eq!(state.status, SessionStatus::AwaitingAnswer);
    }

    #[test]
    fn test_snapshot_shape() {
        let state = SessionState::new("Q", 5);
        let json = serde_json::to_value(state.snapshot()).unwrap();

        assert_eq!(json["status"], "awaitingAnswer");
        assert_eq!(json["acceptedTurnCount"], 0);
        assert_eq!(json["activeQuestion"], "Q");
        assert!(json["lastDelta"].is_null());
        assert_eq!(json["transcript"][0]["role"], "assistant");
    }
}
