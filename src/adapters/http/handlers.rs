//! Request handlers for the interview HTTP API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::types::{
    api_error, ApiError, ErrorResponse, HealthResponse, StartResponse, TurnRequest,
    TurnResponseBody,
};
use crate::domain::errors::InterviewError;
use crate::domain::models::SessionSnapshot;
use crate::services::SessionGateway;

pub(super) type GatewayState = State<Arc<SessionGateway>>;

pub(super) async fn health_check(State(gateway): GatewayState) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        sessions: gateway.session_count().await,
    })
}

pub(super) async fn start_interview(
    State(gateway): GatewayState,
) -> (StatusCode, Json<StartResponse>) {
    let snapshot = gateway.start().await;
    (StatusCode::CREATED, Json(StartResponse::from(snapshot)))
}

pub(super) async fn submit_turn(
    State(gateway): GatewayState,
    payload: Result<Json<TurnRequest>, JsonRejection>,
) -> Result<Json<TurnResponseBody>, ApiError> {
    let Json(request) = payload.map_err(|rejection| input_error(&rejection.body_text()))?;

    // Cancelled when the client goes away before the handler completes
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    gateway
        .submit(request.session_id, request.answer, cancel)
        .await
        .map(|response| Json(TurnResponseBody::from(response)))
        .map_err(|e| api_error(&e))
}

pub(super) async fn get_session(
    State(gateway): GatewayState,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let session_id = parse_session_id(&session_id)?;
    gateway
        .snapshot(session_id)
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

pub(super) async fn expire_session(
    State(gateway): GatewayState,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session_id = parse_session_id(&session_id)?;
    gateway
        .expire(session_id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| api_error(&e))
}

fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| input_error(&format!("invalid session id '{raw}': {e}")))
}

fn input_error(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    api_error(&InterviewError::Input(message.to_string()))
}
