//! Common test utilities for integration tests
//!
//! Provides scripted collaborators and a controller/gateway wired to them.

use std::sync::Arc;
use std::time::Duration;

use grit_interview::adapters::mock::{MockAnswerValidator, MockQuestionGenerator, MockTraitScorer};
use grit_interview::services::{SessionGateway, TurnController, TurnControllerConfig};
use grit_interview::Collaborators;

/// Answers this long pass the mock validator's fallback rule.
pub const GOOD_ANSWER: &str = "I trained for two years to finish an ultramarathon.";

/// Too short for the mock validator's fallback rule.
pub const POOR_ANSWER: &str = "idk";

/// Mock collaborators plus handles for scripting and call counting.
#[allow(dead_code)]
pub struct Fixture {
    pub validator: Arc<MockAnswerValidator>,
    pub generator: Arc<MockQuestionGenerator>,
    pub scorer: Arc<MockTraitScorer>,
    pub controller: TurnController,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new(max_turns: usize) -> Self {
        Self::with_timeout(max_turns, Duration::from_secs(5))
    }

    pub fn with_timeout(max_turns: usize, call_timeout: Duration) -> Self {
        Self::with_mocks(
            MockAnswerValidator::new(),
            MockQuestionGenerator::new(),
            MockTraitScorer::new(),
            max_turns,
            call_timeout,
        )
    }

    pub fn with_mocks(
        validator: MockAnswerValidator,
        generator: MockQuestionGenerator,
        scorer: MockTraitScorer,
        max_turns: usize,
        call_timeout: Duration,
    ) -> Self {
        let validator = Arc::new(validator);
        let generator = Arc::new(generator);
        let scorer = Arc::new(scorer);
        let controller = TurnController::new(
            Collaborators::new(validator.clone(), generator.clone(), scorer.clone()),
            TurnControllerConfig {
                max_turns,
                call_timeout,
                ..TurnControllerConfig::default()
            },
        );

        Self {
            validator,
            generator,
            scorer,
            controller,
        }
    }

    pub fn into_gateway(self) -> (Arc<SessionGateway>, Handles) {
        let handles = Handles {
            validator: self.validator,
            generator: self.generator,
            scorer: self.scorer,
        };
        (Arc::new(SessionGateway::new(self.controller)), handles)
    }
}

/// Collaborator handles kept after the controller moves into a gateway.
#[allow(dead_code)]
pub struct Handles {
    pub validator: Arc<MockAnswerValidator>,
    pub generator: Arc<MockQuestionGenerator>,
    pub scorer: Arc<MockTraitScorer>,
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
