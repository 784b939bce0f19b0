//! Adapters for external systems.
//!
//! - `collaborators`: remote answer validator, question generator and scorer
//! - `http`: the interview HTTP gateway
//! - `mock`: deterministic stand-in collaborators

pub mod collaborators;
pub mod http;
pub mod mock;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::domain::models::{CollaboratorBackend, CollaboratorsConfig};
use crate::domain::ports::Collaborators;
use collaborators::{ChatCollaborators, HttpCollaborators};
use mock::{MockAnswerValidator, MockQuestionGenerator, MockTraitScorer};

/// Build the collaborators selected by `config.backend`.
///
/// The `chat` backend reads its API key from the environment variable named
/// by `chat.api_key_env`.
pub fn build_collaborators(config: &CollaboratorsConfig) -> Result<Collaborators> {
    let timeout = Duration::from_millis(config.timeout_ms);

    let collaborators = match config.backend {
        CollaboratorBackend::Mock => Collaborators::new(
            Arc::new(MockAnswerValidator::new()),
            Arc::new(MockQuestionGenerator::new()),
            Arc::new(MockTraitScorer::new()),
        ),
        CollaboratorBackend::Http => {
            let client = Arc::new(
                HttpCollaborators::new(config.http.clone(), timeout)
                    .context("Failed to create HTTP collaborators")?,
            );
            Collaborators::new(client.clone(), client.clone(), client)
        }
        CollaboratorBackend::Chat => {
            let api_key = std::env::var(&config.chat.api_key_env).with_context(|| {
                format!("{} is not set", config.chat.api_key_env)
            })?;
            let client = Arc::new(
                ChatCollaborators::new(config.chat.clone(), api_key, timeout)
                    .context("Failed to create chat collaborators")?,
            );
            Collaborators::new(client.clone(), client.clone(), client)
        }
    };

    info!(backend = ?config.backend, timeout_ms = config.timeout_ms, "collaborators ready");
    Ok(collaborators)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_backend_builds() {
        assert!(build_collaborators(&CollaboratorsConfig::default()).is_ok());
    }

    #[test]
    fn test_chat_backend_requires_api_key() {
        let mut config = CollaboratorsConfig::default();
        config.backend = CollaboratorBackend::Chat;
        config.chat.api_key_env = "GRIT_INTERVIEW_TEST_MISSING_KEY".to_string();

        let result = temp_env::with_var_unset("GRIT_INTERVIEW_TEST_MISSING_KEY", || {
            build_collaborators(&config).map(|_| ())
        });
        assert!(result.unwrap_err().to_string().contains("GRIT_INTERVIEW_TEST_MISSING_KEY"));

        let result = temp_env::with_var("GRIT_INTERVIEW_TEST_MISSING_KEY", Some("sk-test"), || {
            build_collaborators(&config).map(|_| ())
        });
        assert!(result.is_ok());
    }
}
