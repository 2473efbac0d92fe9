//! Workout log endpoints

use api_types::workout::WorkoutListParams;
use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
};
use chrono::Utc;
use engine::{
    Requester, Workout, WorkoutListQuery, WorkoutLogged, WorkoutPage, validation::parse_workout,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{ServerError, detached, server::ServerState};

pub async fn log(
    Extension(requester): Extension<Requester>,
    State(state): State<ServerState>,
    Path(client_id): Path<Uuid>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<WorkoutLogged>), ServerError> {
    let Json(body) = payload?;
    state.engine.authorize(&requester, client_id).await?;
    let draft = parse_workout(&body, Utc::now())?;
    let engine = state.engine.clone();
    let logged = detached(async move { engine.log_workout(&requester, client_id, draft).await }).await?;
    Ok((StatusCode::CREATED, Json(logged)))
}

/// Newest first, `limit` capped server side.
pub async fn list(
    Extension(requester): Extension<Requester>,
    State(state): State<ServerState>,
    Path(client_id): Path<Uuid>,
    params: Result<Query<WorkoutListParams>, QueryRejection>,
) -> Result<Json<WorkoutPage>, ServerError> {
    let Query(params) = params?;
    let query = WorkoutListQuery {
        limit: params.limit,
        cursor: params.cursor,
    };
    Ok(Json(state.engine.workouts(&requester, client_id, query).await?))
}

pub async fn get(
    Extension(requester): Extension<Requester>,
    State(state): State<ServerState>,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<Workout>, ServerError> {
    Ok(Json(state.engine.workout(&requester, workout_id).await?))
}

pub async fn remove(
    Extension(requester): Extension<Requester>,
    State(state): State<ServerState>,
    Path(workout_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    let engine = state.engine.clone();
    detached(async move { engine.delete_workout(&requester, workout_id).await }).await?;
    Ok(StatusCode::NO_CONTENT)
}
