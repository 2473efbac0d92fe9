//! Trainer assignment endpoints, admin only

use api_types::assignment::AssignmentNew;
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{Assignment, Requester};
use uuid::Uuid;

use crate::{ServerError, detached, server::ServerState};

pub async fn assign(
    Extension(requester): Extension<Requester>,
    State(state): State<ServerState>,
    payload: Result<Json<AssignmentNew>, JsonRejection>,
) -> Result<(StatusCode, Json<Assignment>), ServerError> {
    let Json(body) = payload?;
    let engine = state.engine.clone();
    let assignment = detached(async move {
        engine
            .assign_trainer(&requester, body.client_id, body.trainer_id)
            .await
    })
    .await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

pub async fn unassign(
    Extension(requester): Extension<Requester>,
    State(state): State<ServerState>,
    Path((client_id, trainer_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    let engine = state.engine.clone();
    detached(async move {
        engine
            .unassign_trainer(&requester, client_id, trainer_id)
            .await
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
