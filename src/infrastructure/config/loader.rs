use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::{CollaboratorBackend, Config};

/// Prefix for environment overrides, e.g. `GRIT_INTERVIEW_SERVER__PORT`.
pub const ENV_PREFIX: &str = "GRIT_INTERVIEW_";

const PROJECT_CONFIG: &str = ".grit-interview/config.yaml";
const LOCAL_CONFIG: &str = ".grit-interview/local.yaml";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_turns: {0}. Must be between 1 and 20")]
    InvalidMaxTurns(usize),

    #[error("Opening question cannot be empty")]
    EmptyOpeningQuestion,

    #[error("Closing message cannot be empty")]
    EmptyClosingMessage,

    #[error("Invalid timeout_ms: must be greater than 0")]
    InvalidTimeout,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Invalid port: 0")]
    InvalidPort,

    #[error("Collaborator endpoint '{0}' cannot be empty")]
    EmptyEndpoint(&'static str),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .grit-interview/config.yaml
    /// 3. .grit-interview/local.yaml (optional overrides)
    /// 4. Environment variables (GRIT_INTERVIEW_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(PROJECT_CONFIG))
            .merge(Yaml::file(LOCAL_CONFIG))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file. Environment overrides still apply.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        // Interview shape
        if !(1..=20).contains(&config.interview.max_turns) {
            return Err(ConfigError::InvalidMaxTurns(config.interview.max_turns));
        }
        if config.interview.opening_question.trim().is_empty() {
            return Err(ConfigError::EmptyOpeningQuestion);
        }
        if config.interview.closing_message.trim().is_empty() {
            return Err(ConfigError::EmptyClosingMessage);
        }

        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        // Collaborators
        let collaborators = &config.collaborators;
        if collaborators.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        match collaborators.backend {
            CollaboratorBackend::Mock => {}
            CollaboratorBackend::Http => {
                let http = &collaborators.http;
                for (name, url) in [
                    ("validator_url", &http.validator_url),
                    ("generator_url", &http.generator_url),
                    ("scorer_url", &http.scorer_url),
                ] {
                    if url.trim().is_empty() {
                        return Err(ConfigError::EmptyEndpoint(name));
                    }
                }
            }
            CollaboratorBackend::Chat => {
                let chat = &collaborators.chat;
                if chat.base_url.trim().is_empty() {
                    return Err(ConfigError::EmptyEndpoint("base_url"));
                }
                if chat.model.trim().is_empty() {
                    return Err(ConfigError::ValidationFailed(
                        "chat model cannot be empty".to_string(),
                    ));
                }
                if chat.api_key_env.trim().is_empty() {
                    return Err(ConfigError::ValidationFailed(
                        "chat api_key_env cannot be empty".to_string(),
                    ));
                }
            }
        }

        // Logging
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}
