//! Chat-completions collaborators.
//!
//! Drives all three collaborators from a single OpenAI-compatible
//! `/v1/chat/completions` endpoint. Replies are expected as bare JSON (or a
//! bare question for the generator); Markdown code fences are stripped first.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use super::{build_client, send_json};
use crate::domain::models::{ChatCollaboratorsConfig, Role, Turn};
use crate::domain::ports::{
    AnswerValidator, CollaboratorError, GeneratedQuestion, QuestionGenerator, QuestionRequest,
    ScoreAssessment, ScoringRequest, TraitScorer, ValidationRequest, ValidationVerdict,
};

const VALIDATOR_TEMPERATURE: f64 = 0.2;
const GENERATOR_TEMPERATURE: f64 = 0.7;
const SCORER_TEMPERATURE: f64 = 0.3;

const VALIDATOR_PROMPT: &str = r#"Judge whether the answer below is a usable response to the interview question.

Reject the answer if any of these hold:
- it is extremely short or evasive ("I don't know", "nothing", "no idea")
- it is a joke or not serious
- it does not address what the question asks

If the answer is usable, return "valid": true and "needsRetry": false.
Otherwise return "valid": false, "needsRetry": true and a short "reason" addressed to the candidate.

Reply with JSON only:
{"valid": true or false, "needsRetry": true or false, "reason": "..."}"#;

const INTERVIEWER_PROMPT: &str = "You are a structured interviewer assessing grit. Ask one open-ended \
question at a time that invites a concrete personal example and probes perseverance, passion, \
goal orientation or resilience. Do not repeat earlier questions. Reply with the question text only.";

const SCORER_PROMPT: &str = r#"Below is an interview transcript. Score only the candidate's latest answer on each grit trait as an integer from 0 to 5. Use 0 when the answer gives no evidence for a trait.

Traits:
- perseverance
- passion
- goal_orientation
- resilience

List in "relatedFactors" the traits the answer gives real evidence for.

Reply with JSON only:
{"score": {"perseverance": n, "passion": n, "goal_orientation": n, "resilience": n}, "relatedFactors": ["..."]}"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Collaborators backed by a chat-completions model.
pub struct ChatCollaborators {
    client: Client,
    config: ChatCollaboratorsConfig,
    api_key: String,
    timeout: Duration,
}

impl ChatCollaborators {
    pub fn new(
        config: ChatCollaboratorsConfig,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: build_client(timeout)?,
            config,
            api_key: api_key.into(),
            timeout,
        })
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f64,
    ) -> Result<String, CollaboratorError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature,
        };
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response: ChatResponse = send_json(
            self.client
                .post(url)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
                .json(&request),
            self.timeout,
        )
        .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CollaboratorError::MalformedResponse("no choices in reply".into()))?;

        debug!(reply_len = content.len(), "chat completion received");
        Ok(strip_code_fences(&content).to_string())
    }
}

/// Remove a surrounding Markdown code fence, with or without a language tag.
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn transcript_text(transcript: &[Turn]) -> String {
    transcript
        .iter()
        .map(|turn| {
            let speaker = match turn.role {
                Role::Assistant => "Interviewer",
                Role::User => "Candidate",
            };
            format!("{speaker}: {}", turn.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_reply<T: serde::de::DeserializeOwned>(reply: &str) -> Result<T, CollaboratorError> {
    serde_json::from_str(reply).map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))
}

fn parse_value<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
) -> Result<T, CollaboratorError> {
    serde_json::from_value(value).map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl AnswerValidator for ChatCollaborators {
    #[instrument(skip(self, request), err)]
    async fn validate(
        &self,
        request: &ValidationRequest,
    ) -> Result<ValidationVerdict, CollaboratorError> {
        let prompt = format!(
            "{VALIDATOR_PROMPT}\n\nQuestion:\n{}\n\nAnswer:\n{}",
            request.question, request.answer
        );
        let reply = self
            .complete(vec![ChatMessage::new("user", prompt)], VALIDATOR_TEMPERATURE)
            .await?;
        parse_reply(&reply)
    }
}

#[async_trait]
impl QuestionGenerator for ChatCollaborators {
    #[instrument(skip(self, request), fields(question_number = request.question_number), err)]
    async fn generate(
        &self,
        request: &QuestionRequest,
    ) -> Result<GeneratedQuestion, CollaboratorError> {
        let mut messages = Vec::with_capacity(request.transcript.len() + 2);
        messages.push(ChatMessage::new(
            "system",
            format!(
                "{INTERVIEWER_PROMPT} This is question {} of {}.",
                request.question_number, request.max_questions
            ),
        ));
        messages.extend(
            request
                .transcript
                .iter()
                .map(|turn| ChatMessage::new(turn.role.as_str(), turn.content.clone())),
        );

        let question_text = self.complete(messages, GENERATOR_TEMPERATURE).await?;
        Ok(GeneratedQuestion { question_text })
    }
}

#[async_trait]
impl TraitScorer for ChatCollaborators {
    #[instrument(skip(self, request), err)]
    async fn score(&self, request: &ScoringRequest) -> Result<ScoreAssessment, CollaboratorError> {
        let prompt = format!(
            "{SCORER_PROMPT}\n\nTranscript:\n{}",
            transcript_text(&request.transcript)
        );
        let reply = self
            .complete(vec![ChatMessage::new("user", prompt)], SCORER_TEMPERATURE)
            .await?;

        // Flat `{perseverance, passion, ...}` replies are accepted too
        let value: serde_json::Value = parse_reply(&reply)?;
        if value.get("score").is_some() {
            return parse_value(value);
        }
        Ok(ScoreAssessment {
            score: parse_value(value)?,
            related_factors: None,
        })
    }
}
