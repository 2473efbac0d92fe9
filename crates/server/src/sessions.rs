//! Training session endpoints

use api_types::session::DeductionRun;
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use engine::{DeductionReport, Requester, TrainingSession, validation::parse_booking};
use serde_json::Value;
use uuid::Uuid;

use crate::{ServerError, detached, server::ServerState};

pub async fn book(
    Extension(requester): Extension<Requester>,
    State(state): State<ServerState>,
    Path(client_id): Path<Uuid>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<TrainingSession>), ServerError> {
    let Json(body) = payload?;
    state.engine.authorize(&requester, client_id).await?;
    let request = parse_booking(&body)?;
    let engine = state.engine.clone();
    let session =
        detached(async move { engine.book_session(&requester, client_id, request).await }).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// On-demand deduction pass. Admin only.
pub async fn run_deductions(
    Extension(requester): Extension<Requester>,
    State(state): State<ServerState>,
    payload: Option<Json<DeductionRun>>,
) -> Result<Json<DeductionReport>, ServerError> {
    let now = payload
        .and_then(|Json(body)| body.now)
        .unwrap_or_else(Utc::now);
    let engine = state.engine.clone();
    let report =
        detached(async move { engine.run_session_deductions(&requester, now).await }).await?;
    Ok(Json(report))
}
