//! Registration and login.

use api_types::{
    DataResponse,
    user::{Credentials, TokenResponse, UserView},
};
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, extract::JsonBody, server::ServerState};

/// Create an account. New accounts start without the premium flag.
pub async fn register(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<Credentials>,
) -> Result<(StatusCode, Json<DataResponse<UserView>>), ServerError> {
    let account = state
        .engine
        .register(&payload.username, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(UserView {
            id: account.id,
            username: account.handle,
            is_premium: account.is_premium,
        })),
    ))
}

/// Exchange a username and password for a bearer token.
pub async fn login(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<Credentials>,
) -> Result<Json<DataResponse<TokenResponse>>, ServerError> {
    let account = state
        .engine
        .authenticate(&payload.username, &payload.password)
        .await?;
    let token = state.tokens.issue(account.id)?;

    Ok(Json(DataResponse::new(TokenResponse {
        token,
        expires_in: state.tokens.ttl().num_seconds(),
    })))
}
