//! # conduit_api
//!
//! HTTP API library for Conduit: login, bearer-token middleware and the
//! protected current-user endpoint.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use conduit_core::auth::jwt::TokenService;
use conduit_core::store::CredentialStore;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, hello, user};

/// Shared application state passed to all handlers.
///
/// Built once at startup; every field is read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Credential lookups.
    pub store: Arc<dyn CredentialStore>,
    /// Token issuance and validation under the active signing key.
    pub tokens: Arc<TokenService>,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenService, config: ApiConfig) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            config,
        }
    }
}

/// Run embedded database migrations.
///
/// Delegates to `conduit_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    conduit_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new().route(routes::POST_USERS_LOGIN, post(auth::login_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route(routes::GET_USER, get(user::current_user_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    let api = Router::new().merge(public).merge(protected);

    Router::new()
        .route(routes::GET_INDEX, get(hello::index))
        .nest(routes::API_BASE, api)
        .fallback(hello::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
