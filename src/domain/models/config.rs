use serde::{Deserialize, Serialize};

/// Opening question asked at the start of every session.
pub const DEFAULT_OPENING_QUESTION: &str = "Question 1: Tell me about a long-term goal or project \
you were determined to see through. What was the biggest obstacle you faced, and how did you \
overcome it?";

/// Message appended once the final answer has been scored.
pub const DEFAULT_CLOSING_MESSAGE: &str =
    "Thank you for your time. This concludes the interview.";

/// Main configuration structure for the interview service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// HTTP gateway configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Interview shape
    #[serde(default)]
    pub interview: InterviewConfig,

    /// External analysis collaborators
    #[serde(default)]
    pub collaborators: CollaboratorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to enable permissive CORS
    #[serde(default)]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8780
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: false,
        }
    }
}

/// Interview shape configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InterviewConfig {
    /// Accepted answers before the session closes (1-20)
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Fixed first question; never generated
    #[serde(default = "default_opening_question")]
    pub opening_question: String,

    /// Message appended when the session completes
    #[serde(default = "default_closing_message")]
    pub closing_message: String,
}

const fn default_max_turns() -> usize {
    5
}

fn default_opening_question() -> String {
    DEFAULT_OPENING_QUESTION.to_string()
}

fn default_closing_message() -> String {
    DEFAULT_CLOSING_MESSAGE.to_string()
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            opening_question: default_opening_question(),
            closing_message: default_closing_message(),
        }
    }
}

/// Which collaborator implementation backs the three analysis ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorBackend {
    /// Deterministic local stand-ins
    #[default]
    Mock,
    /// One JSON HTTP service per collaborator
    Http,
    /// OpenAI-compatible chat-completions endpoint
    Chat,
}

/// External collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CollaboratorsConfig {
    #[serde(default)]
    pub backend: CollaboratorBackend,

    /// Upper bound on each external call in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub http: HttpCollaboratorsConfig,

    #[serde(default)]
    pub chat: ChatCollaboratorsConfig,
}

const fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for CollaboratorsConfig {
    fn default() -> Self {
        Self {
            backend: CollaboratorBackend::default(),
            timeout_ms: default_timeout_ms(),
            http: HttpCollaboratorsConfig::default(),
            chat: ChatCollaboratorsConfig::default(),
        }
    }
}

/// Endpoints for the `http` backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpCollaboratorsConfig {
    #[serde(default = "default_validator_url")]
    pub validator_url: String,

    #[serde(default = "default_generator_url")]
    pub generator_url: String,

    #[serde(default = "default_scorer_url")]
    pub scorer_url: String,
}

fn default_validator_url() -> String {
    "http://127.0.0.1:8781/validate-answer".to_string()
}

fn default_generator_url() -> String {
    "http://127.0.0.1:8781/generate-question".to_string()
}

fn default_scorer_url() -> String {
    "http://127.0.0.1:8781/evaluate-traits".to_string()
}

impl Default for HttpCollaboratorsConfig {
    fn default() -> Self {
        Self {
            validator_url: default_validator_url(),
            generator_url: default_generator_url(),
            scorer_url: default_scorer_url(),
        }
    }
}

/// Settings for the `chat` backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChatCollaboratorsConfig {
    /// Base URL; requests go to `{base_url}/v1/chat/completions`
    #[serde(default = "default_chat_base_url")]
    pub base_url: String,

    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_chat_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for ChatCollaboratorsConfig {
    fn default() -> Self {
        Self {
            base_url: default_chat_base_url(),
            model: default_chat_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation for file output: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
