//! JSON-over-HTTP collaborators.
//!
//! Each collaborator lives at its own URL and speaks the camelCase bodies of
//! the port request and response types directly.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

use super::{build_client, send_json};
use crate::domain::models::HttpCollaboratorsConfig;
use crate::domain::ports::{
    AnswerValidator, CollaboratorError, GeneratedQuestion, QuestionGenerator, QuestionRequest,
    ScoreAssessment, ScoringRequest, TraitScorer, ValidationRequest, ValidationVerdict,
};

/// Client for the three HTTP collaborator endpoints.
pub struct HttpCollaborators {
    client: Client,
    config: HttpCollaboratorsConfig,
    timeout: Duration,
}

impl HttpCollaborators {
    pub fn new(config: HttpCollaboratorsConfig, timeout: Duration) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: build_client(timeout)?,
            config,
            timeout,
        })
    }
}

#[async_trait]
impl AnswerValidator for HttpCollaborators {
    #[instrument(skip(self, request), fields(url = %self.config.validator_url), err)]
    async fn validate(
        &self,
        request: &ValidationRequest,
    ) -> Result<ValidationVerdict, CollaboratorError> {
        send_json(
            self.client.post(&self.config.validator_url).json(request),
            self.timeout,
        )
        .await
    }
}

#[async_trait]
impl QuestionGenerator for HttpCollaborators {
    #[instrument(skip(self, request), fields(url = %self.config.generator_url), err)]
    async fn generate(
        &self,
        request: &QuestionRequest,
    ) -> Result<GeneratedQuestion, CollaboratorError> {
        send_json(
            self.client.post(&self.config.generator_url).json(request),
            self.timeout,
        )
        .await
    }
}

#[async_trait]
impl TraitScorer for HttpCollaborators {
    #[instrument(skip(self, request), fields(url = %self.config.scorer_url), err)]
    async fn score(&self, request: &ScoringRequest) -> Result<ScoreAssessment, CollaboratorError> {
        send_json(
            self.client.post(&self.config.scorer_url).json(request),
            self.timeout,
        )
        .await
    }
}
