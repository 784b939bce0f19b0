use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::CollaboratorError;

/// Request body sent to the answer validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// The active question
    pub question: String,
    /// The submitted answer
    pub answer: String,
}

/// Validator judgment on one answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationVerdict {
    pub valid: bool,
    #[serde(default)]
    pub needs_retry: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidationVerdict {
    pub const fn accepted() -> Self {
        Self {
            valid: true,
            needs_retry: false,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            needs_retry: true,
            reason: Some(reason.into()),
        }
    }

    /// An answer is usable only when it is valid and no retry was requested.
    pub const fn is_acceptable(&self) -> bool {
        self.valid && !self.needs_retry
    }
}

/// Judges whether an answer is substantive enough to score.
///
/// Implementations wrap an external reasoning service; the controller never
/// judges answer quality itself.
#[async_trait]
pub trait AnswerValidator: Send + Sync {
    /// Validate an answer against the question it responds to
    ///
    /// # Returns
    /// * `Ok(verdict)` - the collaborator reached a judgment
    /// * `Err(CollaboratorError)` - the service was unreachable or returned unparsable output
    async fn validate(
        &self,
        request: &ValidationRequest,
    ) -> Result<ValidationVerdict, CollaboratorError>;
}
