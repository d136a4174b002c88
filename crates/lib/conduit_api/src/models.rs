//! Request and response bodies.
//!
//! Every user payload travels in a `{"user": ...}` envelope.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `POST /api/users/login` body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user: LoginUser,
}

#[derive(Deserialize)]
pub struct LoginUser {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginUser")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Public profile returned by login and current-user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub email: String,
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserProfile,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
