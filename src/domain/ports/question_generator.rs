use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::CollaboratorError;
use crate::domain::models::Turn;

/// Request body sent to the question generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    /// Transcript including the answer being committed
    pub transcript: Vec<Turn>,
    /// 1-based number of the question to generate
    pub question_number: usize,
    /// Total questions in the interview
    pub max_questions: usize,
}

/// Generator output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question_text: String,
}

/// Produces the next open-ended interview question from the transcript.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Generate the next question
    ///
    /// # Returns
    /// * `Ok(question)` - question text to append as an assistant turn
    /// * `Err(CollaboratorError)` - generation failed; the turn is not committed
    async fn generate(
        &self,
        request: &QuestionRequest,
    ) -> Result<GeneratedQuestion, CollaboratorError>;
}
