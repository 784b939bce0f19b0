//! Transcript turns and the append-only transcript store.

use serde::{Deserialize, Serialize};

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The interviewee.
    User,
    /// The interviewer (questions, retry prompts and the closing message).
    Assistant,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in the transcript. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// Set on assistant turns that ask for a resubmission rather than a new answer.
    #[serde(default)]
    pub is_retry_prompt: bool,
}

impl Turn {
    /// An interviewee answer.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            is_retry_prompt: false,
        }
    }

    /// A question or closing message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            is_retry_prompt: false,
        }
    }

    /// A request to answer the active question again.
    pub fn retry_prompt(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            is_retry_prompt: true,
        }
    }

    /// True for assistant turns that pose a question (or close the session).
    pub const fn is_question(&self) -> bool {
        matches!(self.role, Role::Assistant) && !self.is_retry_prompt
    }
}

/// Ordered, append-only log of turns.
///
/// Insertion order defines question/answer pairing. There is no removal or
/// rewrite operation; corrections are expressed by appending further turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn and returns the new length.
    pub fn append(&mut self, turn: Turn) -> usize {
        self.turns.push(turn);
        self.turns.len()
    }

    /// The full ordered sequence.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The active question: the most recent assistant turn that is not a retry prompt.
    pub fn last_assistant_turn(&self) -> Option<&Turn> {
        self.turns.iter().rev().find(|turn| turn.is_question())
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Copy of the transcript with a pending answer appended, used to brief
    /// collaborators before the answer is committed.
    pub fn with_pending(&self, turn: Turn) -> Vec<Turn> {
        let mut turns = Vec::with_capacity(self.turns.len() + 1);
        turns.extend_from_slice(&self.turns);
        turns.push(turn);
        turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_returns_new_length() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.append(Turn::assistant("Q1")), 1);
        assert_eq!(transcript.append(Turn::user("A1")), 2);
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_last_assistant_turn_skips_retry_prompts() {
        let mut transcript = Transcript::new();
        assert!(transcript.last_assistant_turn().is_none());

        transcript.append(Turn::assistant("Q1"));
        transcript.append(Turn::user("nothing"));
        transcript.append(Turn::retry_prompt("Please elaborate"));

        let active = transcript.last_assistant_turn().unwrap();
        assert_eq!(active.content, "Q1");
        assert!(!active.is_retry_prompt);
    }

    #[test]
    fn test_with_pending_leaves_transcript_untouched() {
        let mut transcript = Transcript::new();
        transcript.append(Turn::assistant("Q1"));

        let briefing = transcript.with_pending(Turn::user("A1"));
        assert_eq!(briefing.len(), 2);
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn test_turn_wire_format() {
        let json = serde_json::to_value(Turn::retry_prompt("again")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["isRetryPrompt"], true);

        let parsed: Turn = serde_json::from_str(r#"{"role":"user","content":"hi"}"#).unwrap();
        assert_eq!(parsed, Turn::user("hi"));
    }
}
