//! Route paths.
//!
//! API paths are relative to [`API_BASE`], under which the API router is
//! nested.

/// Prefix the API router is mounted under.
pub const API_BASE: &str = "/api";

/// `GET /` — index page.
pub const GET_INDEX: &str = "/";

/// `POST /api/users/login`
pub const POST_USERS_LOGIN: &str = "/users/login";

/// `GET /api/user`
pub const GET_USER: &str = "/user";
