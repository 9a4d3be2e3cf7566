use axum::{
    Extension, Router,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};

use std::sync::Arc;

use crate::{ServerError, expenses, statistics, user};
use auth::{AuthError, RequestContext, TokenService};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub tokens: Arc<TokenService>,
}

impl ServerState {
    pub fn new(engine: Engine, tokens: TokenService) -> Self {
        Self {
            engine: Arc::new(engine),
            tokens: Arc::new(tokens),
        }
    }
}

/// Verify the bearer credential and attach the caller identity.
async fn auth(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let header = match request.headers().get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedHeader)?),
        None => None,
    };
    let context = state.tokens.authenticate(header)?;

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Let the request through only for premium accounts.
async fn premium_only(
    State(state): State<ServerState>,
    Extension(context): Extension<RequestContext>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    state.engine.require_premium(context.user_id).await?;
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let premium = Router::new()
        .route("/expenses/stats", get(statistics::get_stats))
        .route("/expenses/export", get(statistics::export_csv))
        .route_layer(middleware::from_fn_with_state(state.clone(), premium_only));

    let protected = Router::new()
        .route("/expenses", post(expenses::create).get(expenses::list))
        .route("/expenses/{id}", put(expenses::update).delete(expenses::delete))
        .merge(premium)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    let public = Router::new()
        .route("/register", post(user::register))
        .route("/login", post(user::login));

    Router::new()
        .nest("/api", public.merge(protected))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}
