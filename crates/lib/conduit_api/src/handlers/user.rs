//! Current-user handler.

use axum::extract::State;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::UserResponse;
use crate::services::auth;

/// `GET /api/user` — profile of the authenticated user.
///
/// Only reachable behind `require_auth`, which supplies the identity.
pub async fn current_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<UserResponse>> {
    let user = auth::current_user(&state, &user).await?;
    Ok(Json(UserResponse { user }))
}
