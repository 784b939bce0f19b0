//! Bounded retry policy for answer validation.
//!
//! The validator collaborator decides whether an answer is usable. This
//! policy only bounds the loop: one retry per question, after which an
//! answer the validator still rejects is force-accepted and flagged as low
//! confidence.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::with_deadline;
use crate::domain::ports::{AnswerValidator, CollaboratorError, ValidationRequest, ValidationVerdict};

/// Retries allowed for a single question.
pub const MAX_RETRIES_PER_QUESTION: u32 = 1;

const DEFAULT_REJECTION_REASON: &str =
    "The answer was too brief or did not address the question.";

/// Outcome of evaluating one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Validator accepted the answer
    Accept,
    /// Validator rejected the answer and the question still has a retry left
    Retry { reason: String },
    /// Validator rejected the answer again; accepted anyway to guarantee progress
    ForceAccept { reason: String },
}

impl RetryDecision {
    /// Whether the answer proceeds to scoring.
    pub const fn accept(&self) -> bool {
        !matches!(self, Self::Retry { .. })
    }

    pub const fn is_low_confidence(&self) -> bool {
        matches!(self, Self::ForceAccept { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Accept => None,
            Self::Retry { reason } | Self::ForceAccept { reason } => Some(reason),
        }
    }
}

/// Retry policy delegating judgment to an [`AnswerValidator`].
pub struct RetryPolicy {
    validator: Arc<dyn AnswerValidator>,
    call_timeout: Duration,
}

impl RetryPolicy {
    pub fn new(validator: Arc<dyn AnswerValidator>, call_timeout: Duration) -> Self {
        Self {
            validator,
            call_timeout,
        }
    }

    /// Validate `answer` against `question` and decide whether to accept it.
    ///
    /// # Arguments
    /// * `question` - the active question
    /// * `answer` - the submitted answer
    /// * `retry_attempts_so_far` - retries already granted for this question
    ///
    /// # Returns
    /// * `Ok(RetryDecision)` - accept, retry or force-accept
    /// * `Err(CollaboratorError)` - the validator failed or timed out
    #[instrument(skip(self, question, answer), fields(answer_len = answer.len()), err)]
    pub async fn evaluate(
        &self,
        question: &str,
        answer: &str,
        retry_attempts_so_far: u32,
    ) -> Result<RetryDecision, CollaboratorError> {
        let request = ValidationRequest {
            question: question.to_string(),
            answer: answer.to_string(),
        };

        let verdict = with_deadline(self.call_timeout, self.validator.validate(&request)).await?;
        let decision = Self::decide(&verdict, retry_attempts_so_far);

        match &decision {
            RetryDecision::Accept => debug!("answer accepted by validator"),
            RetryDecision::Retry { reason } => debug!(%reason, "answer rejected, retry granted"),
            RetryDecision::ForceAccept { reason } => {
                warn!(%reason, "answer rejected after retry, force-accepting");
            }
        }

        Ok(decision)
    }

    /// Pure decision rule applied to a validator verdict.
    pub fn decide(verdict: &ValidationVerdict, retry_attempts_so_far: u32) -> RetryDecision {
        if verdict.is_acceptable() {
            return RetryDecision::Accept;
        }

        let reason = verdict
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REJECTION_REASON)
            .to_string();

        if retry_attempts_so_far < MAX_RETRIES_PER_QUESTION {
            RetryDecision::Retry { reason }
        } else {
            RetryDecision::ForceAccept { reason }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockAnswerValidator;

    #[test]
    fn test_decide_accepts_valid_answer() {
        let decision = RetryPolicy::decide(&ValidationVerdict::accepted(), 0);
        assert_eq!(decision, RetryDecision::Accept);
        assert!(decision.accept());
        assert!(decision.reason().is_none());
    }

    #[test]
    fn test_decide_first_rejection_retries() {
        let decision = RetryPolicy::decide(&ValidationVerdict::rejected("joke answer"), 0);
        assert_eq!(
            decision,
            RetryDecision::Retry {
                reason: "joke answer".to_string()
            }
        );
        assert!(!decision.accept());
    }

    #[test]
    fn test_decide_second_rejection_force_accepts() {
        let decision = RetryPolicy::decide(&ValidationVerdict::rejected("still short"), 1);
        assert!(decision.accept());
        assert!(decision.is_low_confidence());
        assert_eq!(decision.reason(), Some("still short"));
    }

    #[test]
    fn test_needs_retry_alone_counts_as_rejection() {
        let verdict = ValidationVerdict {
            valid: true,
            needs_retry: true,
            reason: None,
        };
        let decision = RetryPolicy::decide(&verdict, 0);
        assert_eq!(
            decision,
            RetryDecision::Retry {
                reason: DEFAULT_REJECTION_REASON.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_evaluate_uses_validator() {
        let validator = Arc::new(MockAnswerValidator::new());
        validator
            .push_verdict(Ok(ValidationVerdict::rejected("off topic")))
            .await;
        let policy = RetryPolicy::new(validator.clone(), Duration::from_secs(1));

        let decision = policy.evaluate("Q", "bananas", 0).await.unwrap();
        assert!(!decision.accept());
        assert_eq!(validator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_evaluate_propagates_validator_failure() {
        let validator = Arc::new(MockAnswerValidator::new());
        validator
            .push_verdict(Err(CollaboratorError::Unavailable("down".into())))
            .await;
        let policy = RetryPolicy::new(validator, Duration::from_secs(1));

        let result = policy.evaluate("Q", "a real answer", 0).await;
        assert!(matches!(result, Err(CollaboratorError::Unavailable(_))));
    }
}
