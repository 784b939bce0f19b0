//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces for the three external analysis
//! collaborators:
//! - AnswerValidator: judges whether an answer is usable
//! - QuestionGenerator: produces the next question
//! - TraitScorer: scores an answer on the four traits
//!
//! The controller depends only on these traits, so it can be driven by
//! deterministic stand-ins in tests and by remote services in production.

pub mod answer_validator;
pub mod errors;
pub mod question_generator;
pub mod trait_scorer;

use std::sync::Arc;

pub use answer_validator::{AnswerValidator, ValidationRequest, ValidationVerdict};
pub use errors::CollaboratorError;
pub use question_generator::{GeneratedQuestion, QuestionGenerator, QuestionRequest};
pub use trait_scorer::{ScoreAssessment, ScoringRequest, TraitScorer};

/// The three collaborators a turn controller is wired with.
#[derive(Clone)]
pub struct Collaborators {
    pub validator: Arc<dyn AnswerValidator>,
    pub generator: Arc<dyn QuestionGenerator>,
    pub scorer: Arc<dyn TraitScorer>,
}

impl Collaborators {
    pub fn new(
        validator: Arc<dyn AnswerValidator>,
        generator: Arc<dyn QuestionGenerator>,
        scorer: Arc<dyn TraitScorer>,
    ) -> Self {
        Self {
            validator,
            generator,
            scorer,
        }
    }
}
