//! Domain errors for the interview controller.

use thiserror::Error;
use uuid::Uuid;

use super::models::session::SessionStatus;

/// Errors surfaced by the turn controller and session gateway.
///
/// Transient variants leave the session uncommitted; the caller recovers by
/// resubmitting the same input.
#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Answer validation failed: {0}")]
    Validation(String),

    #[error("Question generation failed: {0}")]
    Generation(String),

    #[error("Trait scoring failed: {0}")]
    Scoring(String),

    #[error("Session {session_id} cannot accept submissions: {reason}")]
    SessionState { session_id: Uuid, reason: String },

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Submission cancelled before analysis started")]
    Cancelled,

    #[error("Invalid state transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InterviewResult<T> = Result<T, InterviewError>;

impl InterviewError {
    /// Stable machine-readable code.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Input(_) => "INPUT_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Generation(_) => "GENERATION_ERROR",
            Self::Scoring(_) => "SCORING_ERROR",
            Self::SessionState { .. } | Self::InvalidTransition { .. } => "SESSION_STATE_ERROR",
            Self::SessionNotFound(_) => "SESSION_NOT_FOUND",
            Self::Cancelled => "CANCELLED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True when resubmitting the identical request may succeed.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Generation(_) | Self::Scoring(_) | Self::Cancelled
        )
    }

    pub fn session_state(session_id: Uuid, reason: impl Into<String>) -> Self {
        Self::SessionState {
            session_id,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors_are_recoverable() {
        assert!(InterviewError::Validation("down".into()).is_recoverable());
        assert!(InterviewError::Generation("down".into()).is_recoverable());
        assert!(InterviewError::Scoring("down".into()).is_recoverable());
        assert!(InterviewError::Cancelled.is_recoverable());
    }

    #[test]
    fn test_fatal_errors_are_not_recoverable() {
        assert!(!InterviewError::Input("empty".into()).is_recoverable());
        assert!(!InterviewError::session_state(Uuid::new_v4(), "completed").is_recoverable());
        assert!(!InterviewError::SessionNotFound(Uuid::new_v4()).is_recoverable());
        assert!(!InterviewError::Internal("panic".into()).is_recoverable());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(InterviewError::Input(String::new()).kind(), "INPUT_ERROR");
        assert_eq!(
            InterviewError::InvalidTransition {
                from: SessionStatus::Completed,
                to: SessionStatus::AwaitingAnswer,
            }
            .kind(),
            "SESSION_STATE_ERROR"
        );
    }
}
