use api_types::error::ErrorBody;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod accounts;
mod assignments;
mod orders;
mod plans;
mod server;
mod sessions;
mod workouts;

pub enum ServerError {
    Engine(EngineError),
    /// Malformed request that never reached the engine.
    Generic(String),
    /// A detached handler task panicked or was aborted.
    Internal(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::InvalidField { .. }
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidRole(_)
        | EngineError::InvalidId(_) => StatusCode::BAD_REQUEST,
        EngineError::Unauthenticated => StatusCode::UNAUTHORIZED,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorBody {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            internal_body()
        }
        EngineError::InvalidField { field, reason } => ErrorBody {
            error: reason,
            field: Some(field),
            unmatched: Vec::new(),
        },
        EngineError::Unprocessable { message, unmatched } => ErrorBody {
            error: message,
            field: None,
            unmatched,
        },
        other => ErrorBody {
            error: other.to_string(),
            field: None,
            unmatched: Vec::new(),
        },
    }
}

fn internal_body() -> ErrorBody {
    ErrorBody {
        error: "internal server error".to_string(),
        field: None,
        unmatched: Vec::new(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Generic(error) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    field: None,
                    unmatched: Vec::new(),
                },
            ),
            ServerError::Internal(err) => {
                tracing::error!("handler task failed: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, internal_body())
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

/// Runs an engine write on its own task.
///
/// A dropped request future (client disconnect) does not cancel the spawned
/// task, so the transaction always reaches its commit or rollback.
pub(crate) async fn detached<T, F>(write: F) -> Result<T, ServerError>
where
    F: Future<Output = Result<T, EngineError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(write)
        .await
        .map_err(|err| ServerError::Internal(err.to_string()))?
        .map_err(ServerError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res = ServerError::from(EngineError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_unauthenticated_maps_to_401() {
        let res = ServerError::from(EngineError::Unauthenticated).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::Conflict("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn field_errors_map_to_400_with_the_field() {
        let err = EngineError::field("exercises[0].sets[1].reps", "must be >= 0");
        assert_eq!(status_for_engine_error(&err), StatusCode::BAD_REQUEST);
        let body = body_for_engine_error(err);
        assert_eq!(body.field.as_deref(), Some("exercises[0].sets[1].reps"));
    }

    #[test]
    fn unmatched_library_maps_to_422() {
        let err = EngineError::Unprocessable {
            message: "no match".to_string(),
            unmatched: vec!["Levitation".to_string()],
        };
        assert_eq!(status_for_engine_error(&err), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_for_engine_error(err).unmatched, vec!["Levitation"]);
    }

    #[test]
    fn database_errors_hide_details() {
        let err = EngineError::Database(sea_orm::DbErr::Custom("disk on fire".to_string()));
        assert_eq!(status_for_engine_error(&err), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_for_engine_error(err).error, "internal server error");
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
