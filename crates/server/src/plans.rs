use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{PlanSaved, Requester, validation::parse_plan};
use serde_json::Value;
use uuid::Uuid;

use crate::{ServerError, detached, server::ServerState};

/// Stores a generated plan document for a client.
pub async fn save(
    Extension(requester): Extension<Requester>,
    State(state): State<ServerState>,
    Path(client_id): Path<Uuid>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<PlanSaved>), ServerError> {
    let Json(body) = payload?;
    state.engine.authorize(&requester, client_id).await?;
    let draft = parse_plan(&body)?;
    let engine = state.engine.clone();
    let saved =
        detached(async move { engine.save_workout_plan(&requester, client_id, draft).await }).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}
