//! Authentication middleware — Bearer token extraction and JWT verification.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use conduit_core::models::auth::TokenClaims;
use tracing::debug;

use crate::AppState;
use crate::error::AppError;

/// Identity resolved from a verified token, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: TokenClaims,
    /// The presented token, so handlers can echo it without touching headers.
    pub token: String,
}

/// Pull the credential out of `Authorization: Bearer <token>`.
///
/// The header must be exactly two parts; the scheme is matched
/// case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or("missing authorization header")?
        .to_str()
        .map_err(|_| "authorization header is not visible ASCII")?;

    let (scheme, credential) = value
        .trim()
        .split_once(' ')
        .ok_or("authorization header is not '<scheme> <credential>'")?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err("unsupported authorization scheme");
    }

    let credential = credential.trim();
    if credential.is_empty() || credential.contains(char::is_whitespace) {
        return Err("malformed bearer credential");
    }
    Ok(credential)
}

/// Axum middleware: extracts the bearer token, verifies the JWT, and injects
/// [`AuthenticatedUser`] into request extensions.
///
/// Every rejection is the same 401; the reason only reaches the logs.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = match bearer_token(request.headers()) {
        Ok(token) => token.to_owned(),
        Err(reason) => {
            debug!(reason, "auth: rejecting request");
            return Err(AppError::unauthorized());
        }
    };

    let claims = state.tokens.validate(&token).map_err(|e| {
        debug!(error = %e, "auth: token rejected");
        AppError::unauthorized()
    })?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { claims, token });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_credential() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc")), Ok("abc"));
    }

    #[test]
    fn missing_header_is_rejected() {
        assert!(bearer_token(&HeaderMap::new()).is_err());
    }

    #[test]
    fn malformed_headers_are_rejected() {
        for value in ["Bearer", "Bearer ", "abc.def.ghi", "Basic dXNlcjpwYXNz", "Bearer a b"] {
            assert!(bearer_token(&headers(value)).is_err(), "accepted {value:?}");
        }
    }
}
