//! Domain layer for the interview controller
//!
//! This module contains the session, transcript and scoring models, the error
//! taxonomy, and the ports for the external analysis collaborators.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{InterviewError, InterviewResult};
