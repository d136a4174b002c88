//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::WithRejection;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, UserResponse};
use crate::services::auth;

/// `POST /api/users/login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<LoginRequest>, AppError>,
) -> AppResult<Json<UserResponse>> {
    let user = auth::login(&state, &body.user.email, &body.user.password).await?;
    Ok(Json(UserResponse { user }))
}
