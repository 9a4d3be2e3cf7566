use auth::AuthError;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener};

mod expenses;
mod extract;
mod server;
mod statistics;
mod user;

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Auth(AuthError),
    Internal(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

const NOT_AUTHENTICATED: &str = "not authenticated";
const INTERNAL_ERROR: &str = "internal server error";

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Configuration(_) | EngineError::Internal(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn body_for_engine_error(err: EngineError) -> Error {
    match err {
        EngineError::Unauthenticated(reason) => {
            tracing::debug!("unauthenticated: {reason}");
            Error {
                error: NOT_AUTHENTICATED.to_string(),
                field: None,
            }
        }
        EngineError::Validation { field, message } => Error {
            error: message,
            field: Some(field),
        },
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            Error {
                error: INTERNAL_ERROR.to_string(),
                field: None,
            }
        }
        EngineError::Configuration(_) | EngineError::Internal(_) => {
            tracing::error!("engine failure: {err}");
            Error {
                error: INTERNAL_ERROR.to_string(),
                field: None,
            }
        }
        other => Error {
            error: other.to_string(),
            field: None,
        },
    }
}

fn response_for_auth_error(err: AuthError) -> (StatusCode, Error) {
    match err {
        AuthError::Encode { .. } | AuthError::EmptySecret | AuthError::TtlOutOfRange => {
            tracing::error!(code = err.error_code(), "token service failure: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Error {
                    error: INTERNAL_ERROR.to_string(),
                    field: None,
                },
            )
        }
        other => {
            tracing::debug!(code = other.error_code(), "rejected credential: {other}");
            (
                StatusCode::UNAUTHORIZED,
                Error {
                    error: NOT_AUTHENTICATED.to_string(),
                    field: None,
                },
            )
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Auth(err) => response_for_auth_error(err),
            ServerError::Internal(err) => {
                tracing::error!("internal error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Error {
                        error: INTERNAL_ERROR.to_string(),
                        field: None,
                    },
                )
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

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_unauthenticated_maps_to_401() {
        let res =
            ServerError::from(EngineError::Unauthenticated("user not found".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn auth_errors_map_to_401() {
        for err in [
            AuthError::MissingHeader,
            AuthError::MalformedHeader,
            AuthError::TokenExpired,
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res = ServerError::from(EngineError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::Validation {
            field: "category".to_string(),
            message: "Invalid category".to_string(),
        })
        .into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn engine_database_maps_to_500() {
        let res = ServerError::from(EngineError::Database(sea_orm::DbErr::Custom(
            "boom".to_string(),
        )))
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn engine_internal_maps_to_500() {
        let res = ServerError::from(EngineError::Internal("hashing".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn token_lifetime_failure_maps_to_500() {
        let res = ServerError::from(AuthError::TtlOutOfRange).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
