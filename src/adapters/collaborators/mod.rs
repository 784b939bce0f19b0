//! Remote collaborator backends.
//!
//! - `http`: one JSON service per collaborator
//! - `chat`: an OpenAI-compatible chat-completions endpoint

pub mod chat;
pub mod http;

use reqwest::{header, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::domain::ports::CollaboratorError;

pub use chat::ChatCollaborators;
pub use http::HttpCollaborators;

fn build_client(timeout: Duration) -> Result<Client, CollaboratorError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CollaboratorError::Transport(format!("failed to create HTTP client: {e}")))
}

fn classify_send_error(err: &reqwest::Error, timeout: Duration) -> CollaboratorError {
    if err.is_timeout() {
        CollaboratorError::Timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
    } else {
        CollaboratorError::Transport(err.to_string())
    }
}

/// Send a JSON request and decode a JSON response, classifying every failure.
async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    timeout: Duration,
) -> Result<T, CollaboratorError> {
    let response = request
        .header(header::CONTENT_TYPE, "application/json")
        .send()
        .await
        .map_err(|e| classify_send_error(&e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CollaboratorError::from_status(status.as_u16(), body));
    }

    let body = response
        .text()
        .await
        .map_err(|e| classify_send_error(&e, timeout))?;
    serde_json::from_str(&body).map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))
}
