//! Authentication service — login and current-user flows on top of
//! `conduit_core::auth`.

use chrono::Utc;
use conduit_core::auth::jwt::IssueOptions;
use conduit_core::auth::password::{verify_dummy_blocking, verify_password_blocking};
use conduit_core::models::auth::CredentialRecord;
use conduit_core::store::StoreError;
use tracing::{debug, info};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::UserProfile;

/// Public view of a record; password material never leaves this function.
fn build_profile(record: CredentialRecord, token: String) -> UserProfile {
    UserProfile {
        email: record.email,
        username: record.username,
        bio: record.bio,
        image: record.image,
        token,
    }
}

fn issue_options(state: &AppState) -> IssueOptions {
    match state.config.token_ttl {
        Some(ttl) => IssueOptions::expires_at(Utc::now() + ttl),
        None => IssueOptions::never_expires(),
    }
}

/// Authenticate with email + password.
///
/// Unknown email and wrong password produce the same error after the same
/// amount of hashing work.
pub async fn login(state: &AppState, email: &str, password: &str) -> AppResult<UserProfile> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "email and password are required".into(),
        ));
    }

    let record = match state.store.lookup(email).await {
        Ok(record) => record,
        Err(StoreError::NotFound) => {
            // Hash anyway so an unknown email costs the same as a wrong password.
            if let Err(e) =
                verify_dummy_blocking(state.config.password_scheme, password.to_owned()).await
            {
                debug!(error = %e, "login: dummy verification failed");
            }
            debug!(email, "login failed: unknown email");
            return Err(AppError::invalid_credentials());
        }
        Err(e) => return Err(e.into()),
    };

    let matches = verify_password_blocking(
        state.config.password_scheme,
        password.to_owned(),
        record.password_hash.clone(),
        record.password_salt.clone(),
    )
    .await?;
    if !matches {
        debug!(email, "login failed: password mismatch");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .tokens
        .issue(&record.claim_set(), &issue_options(state))?;
    info!(user_id = %record.id, "user logged in");

    Ok(build_profile(record, token))
}

/// Profile of the user a verified token belongs to.
///
/// A token whose user has since disappeared, or whose email now belongs to
/// a different user, is treated as unauthorized.
pub async fn current_user(state: &AppState, user: &AuthenticatedUser) -> AppResult<UserProfile> {
    let claims = &user.claims.user;
    let record = match state.store.lookup(&claims.email).await {
        Ok(record) => record,
        Err(StoreError::NotFound) => {
            debug!(user_id = %claims.sub, "token subject no longer exists");
            return Err(AppError::unauthorized());
        }
        Err(e) => return Err(e.into()),
    };

    if record.id != claims.sub {
        debug!(user_id = %claims.sub, "token subject does not own this email");
        return Err(AppError::unauthorized());
    }

    Ok(build_profile(record, user.token.clone()))
}
