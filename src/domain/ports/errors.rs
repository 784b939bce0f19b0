use thiserror::Error;

/// Failures reported by an external analysis collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// Service is down, overloaded or rate limiting
    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),

    /// Call exceeded the configured deadline
    #[error("Collaborator timed out after {0}ms")]
    Timeout(u64),

    /// Service refused the request as invalid
    #[error("Collaborator rejected request (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    /// Response could not be parsed or violated the contract
    #[error("Malformed collaborator response: {0}")]
    MalformedResponse(String),

    /// Connection-level failure
    #[error("Transport error: {0}")]
    Transport(String),
}

impl CollaboratorError {
    /// Classify a non-success HTTP status.
    ///
    /// - 408, 429, 5xx: unavailable (transient)
    /// - any other status: rejected
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            408 | 429 | 500..=599 => Self::Unavailable(format!("HTTP {status}: {body}")),
            _ => Self::Rejected { status, body },
        }
    }

    /// Returns true if the same call may succeed when repeated.
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Timeout(_) | Self::Transport(_)
        )
    }
}
