//! Mock collaborators for testing and local runs.
//!
//! Each mock answers from a scripted queue first and falls back to a fixed
//! deterministic rule once the queue is empty.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::domain::models::TraitScore;
use crate::domain::ports::{
    AnswerValidator, CollaboratorError, GeneratedQuestion, QuestionGenerator, QuestionRequest,
    ScoreAssessment, ScoringRequest, TraitScorer, ValidationRequest, ValidationVerdict,
};

/// Answers shorter than this are rejected by the fallback rule.
pub const DEFAULT_MIN_ANSWER_CHARS: usize = 10;

const FOLLOW_UP_TOPICS: [&str; 4] = [
    "a time you kept going after a setback. What kept you motivated?",
    "something you have practised for years. Why did you stick with it?",
    "a goal you set for yourself recently. How are you tracking progress toward it?",
    "a failure that changed your approach. What did you do differently afterwards?",
];

type Scripted<T> = Mutex<VecDeque<Result<T, CollaboratorError>>>;

async fn next_scripted<T>(queue: &Scripted<T>) -> Option<Result<T, CollaboratorError>> {
    queue.lock().await.pop_front()
}

async fn clear_scripted<T>(queue: &Scripted<T>) {
    queue.lock().await.clear();
}

async fn simulate_latency(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

/// Validator that rejects answers below a minimum length.
pub struct MockAnswerValidator {
    scripted: Scripted<ValidationVerdict>,
    min_answer_chars: usize,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockAnswerValidator {
    pub fn new() -> Self {
        Self::with_min_answer_chars(DEFAULT_MIN_ANSWER_CHARS)
    }

    pub fn with_min_answer_chars(min_answer_chars: usize) -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            min_answer_chars,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue the result of the next call.
    pub async fn push_verdict(&self, verdict: Result<ValidationVerdict, CollaboratorError>) {
        self.scripted.lock().await.push_back(verdict);
    }

    /// Drop any queued results.
    pub async fn clear_script(&self) {
        clear_scripted(&self.scripted).await;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockAnswerValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerValidator for MockAnswerValidator {
    async fn validate(
        &self,
        request: &ValidationRequest,
    ) -> Result<ValidationVerdict, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        simulate_latency(self.delay).await;

        if let Some(scripted) = next_scripted(&self.scripted).await {
            return scripted;
        }

        if request.answer.trim().chars().count() < self.min_answer_chars {
            Ok(ValidationVerdict::rejected(
                "The answer is too short to assess. Please describe a concrete experience.",
            ))
        } else {
            Ok(ValidationVerdict::accepted())
        }
    }
}

/// Generator producing numbered follow-up questions.
pub struct MockQuestionGenerator {
    scripted: Scripted<GeneratedQuestion>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockQuestionGenerator {
    pub fn new() -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn push_question(&self, question: Result<GeneratedQuestion, CollaboratorError>) {
        self.scripted.lock().await.push_back(question);
    }

    /// Drop any queued results.
    pub async fn clear_script(&self) {
        clear_scripted(&self.scripted).await;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockQuestionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionGenerator for MockQuestionGenerator {
    async fn generate(
        &self,
        request: &QuestionRequest,
    ) -> Result<GeneratedQuestion, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        simulate_latency(self.delay).await;

        if let Some(scripted) = next_scripted(&self.scripted).await {
            return scripted;
        }

        let topic = FOLLOW_UP_TOPICS[request.question_number % FOLLOW_UP_TOPICS.len()];
        Ok(GeneratedQuestion {
            question_text: format!(
                "Question {} of {}: Tell me about {topic}",
                request.question_number, request.max_questions
            ),
        })
    }
}

/// Scorer returning a fixed score unless scripted otherwise.
pub struct MockTraitScorer {
    scripted: Scripted<ScoreAssessment>,
    default_score: TraitScore,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockTraitScorer {
    pub fn new() -> Self {
        Self::with_default_score(TraitScore::new(3, 3, 3, 3).unwrap_or_default())
    }

    pub fn with_default_score(default_score: TraitScore) -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            default_score,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn push_assessment(&self, assessment: Result<ScoreAssessment, CollaboratorError>) {
        self.scripted.lock().await.push_back(assessment);
    }

    /// Drop any queued results.
    pub async fn clear_script(&self) {
        clear_scripted(&self.scripted).await;
    }

    /// Queue a plain score whose related factors are left for the controller to derive.
    pub async fn push_score(&self, score: TraitScore) {
        self.push_assessment(Ok(ScoreAssessment {
            score,
            related_factors: None,
        }))
        .await;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTraitScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TraitScorer for MockTraitScorer {
    async fn score(&self, _request: &ScoringRequest) -> Result<ScoreAssessment, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        simulate_latency(self.delay).await;

        if let Some(scripted) = next_scripted(&self.scripted).await {
            return scripted;
        }

        Ok(ScoreAssessment {
            score: self.default_score,
            related_factors: None,
        })
    }
}
