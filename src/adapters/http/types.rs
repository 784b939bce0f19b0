//! Wire types for the interview HTTP API.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::InterviewError;
use crate::domain::models::SessionSnapshot;
use crate::services::session_gateway::TurnResponse;
use crate::services::TurnOutcome;

/// Body of `POST /interview/turn`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    pub session_id: Uuid,
    pub answer: String,
}

/// Body returned by `POST /interview/start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub session_id: Uuid,
    pub question: String,
    pub session: SessionSnapshot,
}

impl From<SessionSnapshot> for StartResponse {
    fn from(session: SessionSnapshot) -> Self {
        Self {
            session_id: session.session_id,
            question: session.active_question.clone().unwrap_or_default(),
            session,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeKind {
    RetryRequested,
    Advanced,
    Completed,
}

/// Body returned by `POST /interview/turn`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponseBody {
    pub outcome: OutcomeKind,
    /// Validator's reason, present when a retry was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_reason: Option<String>,
    pub low_confidence: bool,
    pub session: SessionSnapshot,
}

impl From<TurnResponse> for TurnResponseBody {
    fn from(response: TurnResponse) -> Self {
        let (outcome, retry_reason, low_confidence) = match response.outcome {
            TurnOutcome::RetryRequested { reason } => {
                (OutcomeKind::RetryRequested, Some(reason), false)
            }
            TurnOutcome::Advanced { low_confidence } => {
                (OutcomeKind::Advanced, None, low_confidence)
            }
            TurnOutcome::Completed { low_confidence } => {
                (OutcomeKind::Completed, None, low_confidence)
            }
        };

        Self {
            outcome,
            retry_reason,
            low_confidence,
            session: response.snapshot,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub sessions: usize,
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub recoverable: bool,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map the interview error taxonomy onto HTTP responses.
pub fn api_error(err: &InterviewError) -> ApiError {
    let status = match err {
        InterviewError::Input(_) => StatusCode::BAD_REQUEST,
        InterviewError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        InterviewError::SessionState { .. } | InterviewError::InvalidTransition { .. } => {
            StatusCode::CONFLICT
        }
        InterviewError::Validation(_)
        | InterviewError::Generation(_)
        | InterviewError::Scoring(_) => StatusCode::BAD_GATEWAY,
        InterviewError::Cancelled => StatusCode::REQUEST_TIMEOUT,
        InterviewError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: err.kind().to_string(),
            recoverable: err.is_recoverable(),
        }),
    )
}
