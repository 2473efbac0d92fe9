use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::sync::Arc;

use crate::{ServerError, accounts, assignments, orders, plans, sessions, workouts};
use engine::{Engine, EngineError};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Resolves the bearer token to a [`engine::Requester`] stored in the request
/// extensions. Missing or unknown tokens are rejected with 401.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(TypedHeader(Authorization(bearer))) = auth_header else {
        return ServerError::from(EngineError::Unauthenticated).into_response();
    };

    match state.engine.authenticate(bearer.token()).await {
        Ok(requester) => {
            request.extensions_mut().insert(requester);
            next.run(request).await
        }
        Err(err) => ServerError::from(err).into_response(),
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/purchase-and-grant", post(orders::purchase_and_grant))
        .route("/orders", post(orders::checkout))
        .route("/orders/{order_id}", get(orders::get))
        .route("/orders/{order_id}/complete", post(orders::complete))
        .route("/orders/{order_id}/cancel", post(orders::cancel))
        .route("/clients/{client_id}/credits", get(accounts::credits))
        .route(
            "/clients/{client_id}/workouts",
            post(workouts::log).get(workouts::list),
        )
        .route(
            "/workouts/{workout_id}",
            get(workouts::get).delete(workouts::remove),
        )
        .route("/clients/{client_id}/workout-plans", post(plans::save))
        .route("/clients/{client_id}/sessions", post(sessions::book))
        .route("/assignments", post(assignments::assign))
        .route(
            "/assignments/{client_id}/{trainer_id}",
            delete(assignments::unassign),
        )
        .route("/admin/session-deductions", post(sessions::run_deductions))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Arc<Engine>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(ServerState { engine })).await
}

pub fn spawn_with_listener(
    engine: Arc<Engine>,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
