//! grit-interview - structured GRIT interview service
//!
//! Runs a bounded, multi-turn interview: a fixed opening question, free-text
//! answers checked by an external validator with at most one retry per
//! question, and a running per-trait assessment (perseverance, passion, goal
//! orientation, resilience) scored by an external scorer.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): transcript, scores, session state, errors and collaborator ports
//! - **Service Layer** (`services`): retry policy, turn controller, session gateway
//! - **Adapters** (`adapters`): collaborator backends and the HTTP gateway
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use grit_interview::adapters::build_collaborators;
//! use grit_interview::services::{SessionGateway, TurnController, TurnControllerConfig};
//!
//! let config = grit_interview::ConfigLoader::load()?;
//! let controller = TurnController::new(
//!     build_collaborators(&config.collaborators)?,
//!     TurnControllerConfig::from(&config),
//! );
//! let gateway = Arc::new(SessionGateway::new(controller));
//! let session = gateway.start().await;
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{InterviewError, InterviewResult};
pub use domain::models::{
    Config, ScoreAggregator, ScoreHistoryEntry, SessionSnapshot, SessionState, SessionStatus,
    TraitAggregate, TraitKind, TraitScore, Transcript, Turn,
};
pub use domain::ports::{
    AnswerValidator, CollaboratorError, Collaborators, QuestionGenerator, TraitScorer,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{RetryPolicy, SessionGateway, TurnController, TurnControllerConfig};
