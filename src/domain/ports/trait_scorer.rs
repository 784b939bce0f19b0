use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::CollaboratorError;
use crate::domain::models::{TraitScore, Turn};

/// Request body sent to the trait scorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRequest {
    /// Transcript including the answer being scored as its last turn
    pub transcript: Vec<Turn>,
}

/// Scorer output for the latest answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreAssessment {
    /// Absolute score; values outside `[0, 5]` fail to deserialize
    pub score: TraitScore,
    /// Trait names the answer meaningfully moved; `None` when the service omits them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_factors: Option<Vec<String>>,
}

/// Scores the latest answer on the four traits.
#[async_trait]
pub trait TraitScorer: Send + Sync {
    /// Score the last user turn of the transcript
    ///
    /// # Returns
    /// * `Ok(assessment)` - absolute per-trait scores for that answer
    /// * `Err(CollaboratorError)` - scoring failed; the turn is not committed
    async fn score(&self, request: &ScoringRequest) -> Result<ScoreAssessment, CollaboratorError>;
}
