//! Session gateway.
//!
//! Owns the live sessions, keyed by id, and serializes submissions per
//! session. A session that is already processing a submission rejects new
//! ones instead of queueing them. Controller work runs on a spawned task so
//! a caller that goes away mid-call cannot leave a half-applied mutation.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::turn_controller::{TurnController, TurnOutcome};
use crate::domain::errors::{InterviewError, InterviewResult};
use crate::domain::models::{SessionSnapshot, SessionState, SessionStatus};

type SessionSlot = Arc<Mutex<SessionState>>;

/// Result of one processed submission.
#[derive(Debug, Clone)]
pub struct TurnResponse {
    pub outcome: TurnOutcome,
    pub snapshot: SessionSnapshot,
}

/// In-memory session registry in front of a [`TurnController`].
pub struct SessionGateway {
    controller: Arc<TurnController>,
    sessions: RwLock<HashMap<Uuid, SessionSlot>>,
}

impl SessionGateway {
    pub fn new(controller: TurnController) -> Self {
        Self {
            controller: Arc::new(controller),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session and return its initial snapshot.
    #[instrument(skip(self))]
    pub async fn start(&self) -> SessionSnapshot {
        let state = self.controller.start_session();
        let snapshot = state.snapshot();
        self.sessions
            .write()
            .await
            .insert(state.session_id, Arc::new(Mutex::new(state)));
        snapshot
    }

    /// Process one submitted answer for `session_id`.
    #[instrument(skip(self, answer, cancel), fields(answer_len = answer.len()), err)]
    pub async fn submit(
        &self,
        session_id: Uuid,
        answer: String,
        cancel: CancellationToken,
    ) -> InterviewResult<TurnResponse> {
        let slot = self.slot(session_id).await?;
        let mut guard = Arc::clone(&slot).try_lock_owned().map_err(|_| {
            InterviewError::session_state(session_id, "a submission is already in progress")
        })?;

        let controller = Arc::clone(&self.controller);
        let task = tokio::spawn(async move {
            let outcome = controller.submit(&mut guard, &answer, &cancel).await?;
            Ok::<_, InterviewError>(TurnResponse {
                outcome,
                snapshot: guard.snapshot(),
            })
        });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "turn task did not complete");
                Self::recover_aborted_turn(&slot).await;
                Err(InterviewError::Internal(format!("turn task failed: {e}")))
            }
        }
    }

    /// Current snapshot of a session.
    pub async fn snapshot(&self, session_id: Uuid) -> InterviewResult<SessionSnapshot> {
        let slot = self.slot(session_id).await?;
        let guard = slot.try_lock().map_err(|_| {
            InterviewError::session_state(session_id, "a submission is already in progress")
        })?;
        Ok(guard.snapshot())
    }

    /// Drop a session. In-flight submissions finish against their own handle.
    #[instrument(skip(self))]
    pub async fn expire(&self, session_id: Uuid) -> InterviewResult<()> {
        if self.sessions.write().await.remove(&session_id).is_none() {
            return Err(InterviewError::SessionNotFound(session_id));
        }
        info!("session expired");
        Ok(())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns a session left mid-turn by a panicking collaborator to `AwaitingAnswer`.
    /// Nothing was committed, since commits happen after every external call.
    async fn recover_aborted_turn(slot: &SessionSlot) {
        let mut state = slot.lock().await;
        if !matches!(
            state.status,
            SessionStatus::Validating | SessionStatus::Scoring
        ) {
            return;
        }
        match state.transition(SessionStatus::AwaitingAnswer) {
            Ok(()) => warn!(session_id = %state.session_id, "session reset after aborted turn"),
            Err(e) => error!(error = %e, "failed to reset session after aborted turn"),
        }
    }

    async fn slot(&self, session_id: Uuid) -> InterviewResult<SessionSlot> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or(InterviewError::SessionNotFound(session_id))
    }
}
