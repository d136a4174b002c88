//! Index page and fallback.

use axum::http::Uri;
use axum::response::Html;

use crate::error::AppError;

/// `GET /` — unauthenticated liveness page.
pub async fn index() -> Html<String> {
    Html(conduit_core::hello::hello_world())
}

/// Any request no route matched.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}
