//! Extractors whose rejections go through [`ServerError`], so malformed
//! input is answered with the usual `{"error", "field"}` body.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query, Request,
        path::ErrorKind,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::request::Parts,
};
use engine::EngineError;
use serde::de::DeserializeOwned;

use crate::ServerError;

/// JSON request body.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// Typed path parameters.
pub struct PathParam<T>(pub T);

impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(path_rejection(rejection)),
        }
    }
}

/// Typed query string.
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(query_rejection(rejection)),
        }
    }
}

fn invalid(field: &str, message: String) -> ServerError {
    ServerError::Engine(EngineError::Validation {
        field: field.to_string(),
        message,
    })
}

/// Name of the field serde reported as missing, if any.
fn missing_field(message: &str) -> Option<&str> {
    let (_, rest) = message.split_once("missing field `")?;
    rest.split_once('`').map(|(field, _)| field)
}

fn json_rejection(rejection: JsonRejection) -> ServerError {
    let message = rejection.body_text();
    tracing::debug!("rejected request body: {message}");
    let field = missing_field(&message).unwrap_or("body").to_string();
    invalid(&field, message)
}

fn path_rejection(rejection: PathRejection) -> ServerError {
    let field = match &rejection {
        PathRejection::FailedToDeserializePathParams(err) => match err.kind() {
            ErrorKind::ParseErrorAtKey { key, .. } => key.clone(),
            _ => "path".to_string(),
        },
        _ => "path".to_string(),
    };
    invalid(&field, rejection.body_text())
}

fn query_rejection(rejection: QueryRejection) -> ServerError {
    let message = rejection.body_text();
    let field = missing_field(&message).unwrap_or("query").to_string();
    invalid(&field, message)
}
