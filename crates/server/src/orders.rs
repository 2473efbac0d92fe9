//! Purchase and order endpoints

use api_types::order::OrderComplete;
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{
    Order, PurchaseReceipt, Requester,
    validation::{parse_client_id, parse_purchase},
};
use serde_json::Value;
use uuid::Uuid;

use crate::{ServerError, detached, server::ServerState};

/// Checkout and credit grant in one go. Admins and assigned trainers only.
pub async fn purchase_and_grant(
    Extension(requester): Extension<Requester>,
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PurchaseReceipt>, ServerError> {
    let Json(body) = payload?;
    state
        .engine
        .authorize_grant(&requester, parse_client_id(&body)?)
        .await?;
    let request = parse_purchase(&body)?;
    let engine = state.engine.clone();
    let receipt = detached(async move { engine.purchase_and_grant(&requester, &request).await }).await?;
    Ok(Json(receipt))
}

/// Creates a `pending_payment` order.
pub async fn checkout(
    Extension(requester): Extension<Requester>,
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ServerError> {
    let Json(body) = payload?;
    state.engine.authorize(&requester, parse_client_id(&body)?).await?;
    let request = parse_purchase(&body)?;
    let engine = state.engine.clone();
    let order = detached(async move { engine.checkout(&requester, &request).await }).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get(
    Extension(requester): Extension<Requester>,
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, ServerError> {
    Ok(Json(state.engine.order(&requester, order_id).await?))
}

pub async fn complete(
    Extension(requester): Extension<Requester>,
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
    payload: Option<Json<OrderComplete>>,
) -> Result<Json<PurchaseReceipt>, ServerError> {
    let payment_reference = payload.and_then(|Json(body)| body.payment_reference);
    let engine = state.engine.clone();
    let receipt = detached(async move {
        engine
            .complete_order(&requester, order_id, payment_reference)
            .await
    })
    .await?;
    Ok(Json(receipt))
}

pub async fn cancel(
    Extension(requester): Extension<Requester>,
    State(state): State<ServerState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, ServerError> {
    let engine = state.engine.clone();
    let order = detached(async move { engine.cancel_order(&requester, order_id).await }).await?;
    Ok(Json(order))
}
