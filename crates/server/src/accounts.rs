use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::{CreditBalance, Requester};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// Credit balance of a client.
pub async fn credits(
    Extension(requester): Extension<Requester>,
    State(state): State<ServerState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<CreditBalance>, ServerError> {
    Ok(Json(state.engine.credits(&requester, client_id).await?))
}
