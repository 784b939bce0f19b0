//! Domain models for interview sessions, transcripts and trait scores.

pub mod aggregator;
pub mod config;
pub mod score;
pub mod session;
pub mod turn;

pub use aggregator::ScoreAggregator;
pub use config::{
    ChatCollaboratorsConfig, CollaboratorBackend, CollaboratorsConfig, Config,
    HttpCollaboratorsConfig, InterviewConfig, LoggingConfig, ServerConfig,
    DEFAULT_CLOSING_MESSAGE, DEFAULT_OPENING_QUESTION,
};
pub use score::{
    ScoreHistoryEntry, TraitAggregate, TraitKind, TraitScore, TraitScoreError, MAX_TRAIT_SCORE,
};
pub use session::{SessionSnapshot, SessionState, SessionStatus};
pub use turn::{Role, Transcript, Turn};
