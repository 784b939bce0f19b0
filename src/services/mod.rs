//! Application services: the turn controller, its retry policy and the
//! session gateway that serializes access to live sessions.

pub mod retry_policy;
pub mod session_gateway;
pub mod turn_controller;

use std::future::Future;
use std::time::Duration;

use crate::domain::ports::CollaboratorError;

pub use retry_policy::{RetryDecision, RetryPolicy, MAX_RETRIES_PER_QUESTION};
pub use session_gateway::{SessionGateway, TurnResponse};
pub use turn_controller::{TurnController, TurnControllerConfig, TurnOutcome};

/// Run a collaborator call under a deadline. An elapsed deadline is reported
/// as [`CollaboratorError::Timeout`].
pub(crate) async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, CollaboratorError>
where
    F: Future<Output = Result<T, CollaboratorError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(CollaboratorError::Timeout(
            u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
        )),
    }
}
