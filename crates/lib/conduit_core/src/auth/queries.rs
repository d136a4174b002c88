//! Auth-related database queries.

use sqlx::PgPool;

use crate::models::auth::{CredentialRecord, NewCredentials};

type CredentialRow = (
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    String,
);

/// Fetch the credential record for an email (exact match, store collation).
pub async fn find_credentials_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<CredentialRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, CredentialRow>(
        "SELECT id::text, email, username, bio, image, password_hash, password_salt \
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(
        |(id, email, username, bio, image, password_hash, password_salt)| CredentialRecord {
            id,
            email,
            username,
            bio,
            image,
            password_hash,
            password_salt,
        },
    ))
}

/// Insert a user, or overwrite profile and password of an existing email.
/// Returns the user ID.
pub async fn upsert_credentials(
    pool: &PgPool,
    creds: &NewCredentials,
) -> Result<String, sqlx::Error> {
    let user_id = sqlx::query_scalar::<_, String>(
        "INSERT INTO users (email, username, bio, image, password_hash, password_salt) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (email) DO UPDATE SET \
           username = EXCLUDED.username, \
           bio = EXCLUDED.bio, \
           image = EXCLUDED.image, \
           password_hash = EXCLUDED.password_hash, \
           password_salt = EXCLUDED.password_salt \
         RETURNING id::text",
    )
    .bind(&creds.email)
    .bind(&creds.username)
    .bind(creds.bio.as_deref())
    .bind(creds.image.as_deref())
    .bind(&creds.password_hash)
    .bind(&creds.password_salt)
    .fetch_one(pool)
    .await?;
    Ok(user_id)
}
