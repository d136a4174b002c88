//! Salted password verification.
//!
//! Two schemes are understood, and the configured one must match whatever
//! wrote the stored hashes:
//!
//! - [`PasswordScheme::SaltedSha512`]: upper-case hex of
//!   `SHA-512(salt || password)`, with the salt column holding hex text.
//! - [`PasswordScheme::Bcrypt`]: a bcrypt hash string; the salt column is
//!   unused because bcrypt embeds its own salt.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use rand::{Rng, rng};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Random salt length in bytes (hex-encoded to twice this).
const SALT_LEN: usize = 32;

/// Plaintext behind the dummy hashes; never matches a real login.
const DUMMY_PASSWORD: &str = "conduit-unknown-user";

static DUMMY_SHA512: LazyLock<Option<StoredPassword>> =
    LazyLock::new(|| hash_password(PasswordScheme::SaltedSha512, DUMMY_PASSWORD).ok());

static DUMMY_BCRYPT: LazyLock<Option<StoredPassword>> =
    LazyLock::new(|| hash_password(PasswordScheme::Bcrypt, DUMMY_PASSWORD).ok());

/// Hashing scheme used by the credential store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordScheme {
    #[default]
    SaltedSha512,
    Bcrypt,
}

impl FromStr for PasswordScheme {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha512" | "salted-sha512" => Ok(PasswordScheme::SaltedSha512),
            "bcrypt" => Ok(PasswordScheme::Bcrypt),
            other => Err(AuthError::ValidationError(format!(
                "unknown password scheme '{other}' (expected 'sha512' or 'bcrypt')"
            ))),
        }
    }
}

impl fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordScheme::SaltedSha512 => f.write_str("sha512"),
            PasswordScheme::Bcrypt => f.write_str("bcrypt"),
        }
    }
}

/// Hash and salt as persisted in the `users` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPassword {
    pub hash: String,
    pub salt: String,
}

fn sha512_digest(password: &str, salt: &str) -> Vec<u8> {
    let mut hasher = Sha512::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_LEN];
    rng().fill(&mut bytes);
    hex::encode_upper(bytes)
}

/// Hash a password under `scheme` with a fresh salt.
pub fn hash_password(scheme: PasswordScheme, password: &str) -> Result<StoredPassword, AuthError> {
    match scheme {
        PasswordScheme::SaltedSha512 => {
            let salt = generate_salt();
            let hash = hex::encode_upper(sha512_digest(password, &salt));
            Ok(StoredPassword { hash, salt })
        }
        PasswordScheme::Bcrypt => {
            let hash = bcrypt::hash(password, BCRYPT_COST)
                .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))?;
            Ok(StoredPassword {
                hash,
                salt: String::new(),
            })
        }
    }
}

/// Check `password` against a stored hash and salt.
///
/// A well-formed mismatch is `Ok(false)`. An undecodable stored hash is an
/// error: it means the record was written by something else.
pub fn verify_password(
    scheme: PasswordScheme,
    password: &str,
    hash: &str,
    salt: &str,
) -> Result<bool, AuthError> {
    match scheme {
        PasswordScheme::SaltedSha512 => {
            let stored = hex::decode(hash)
                .map_err(|e| AuthError::Internal(format!("stored sha512 hash: {e}")))?;
            let computed = sha512_digest(password, salt);
            Ok(computed.as_slice().ct_eq(stored.as_slice()).into())
        }
        PasswordScheme::Bcrypt => bcrypt::verify(password, hash)
            .map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}"))),
    }
}

/// [`verify_password`] on the blocking pool, so hashing never stalls the
/// request executor.
pub async fn verify_password_blocking(
    scheme: PasswordScheme,
    password: String,
    hash: String,
    salt: String,
) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(scheme, &password, &hash, &salt))
        .await
        .map_err(|e| AuthError::Internal(format!("password verification task: {e}")))?
}

/// Hash and salt shaped like a real row for `scheme` (same cost, same
/// lengths), computed once on first use.
pub fn dummy_password(scheme: PasswordScheme) -> Option<&'static StoredPassword> {
    match scheme {
        PasswordScheme::SaltedSha512 => DUMMY_SHA512.as_ref(),
        PasswordScheme::Bcrypt => DUMMY_BCRYPT.as_ref(),
    }
}

/// Spend the same work as [`verify_password_blocking`] for a login that has
/// no stored record, so unknown emails cost as much as wrong passwords.
pub async fn verify_dummy_blocking(
    scheme: PasswordScheme,
    password: String,
) -> Result<(), AuthError> {
    if let Some(dummy) = dummy_password(scheme) {
        verify_password_blocking(scheme, password, dummy.hash.clone(), dummy.salt.clone())
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha512_round_trip() {
        let stored = hash_password(PasswordScheme::SaltedSha512, "jakejake").unwrap();
        assert_eq!(stored.salt.len(), SALT_LEN * 2);
        assert_eq!(stored.hash.len(), 128);
        assert!(
            verify_password(
                PasswordScheme::SaltedSha512,
                "jakejake",
                &stored.hash,
                &stored.salt
            )
            .unwrap()
        );
    }

    #[test]
    fn sha512_matches_known_digest() {
        // SHA-512("abc") with an empty salt.
        let expected = "DDAF35A193617ABACC417349AE20413112E6FA4E89A97EA20A9EEEE64B55D39A\
                        2192992A274FC1A836BA3C23A3FEEBBD454D4423643CE80E2A9AC94FA54CA49F";
        assert!(verify_password(PasswordScheme::SaltedSha512, "abc", expected, "").unwrap());
        // Stored hex may be lower-case.
        assert!(
            verify_password(
                PasswordScheme::SaltedSha512,
                "abc",
                &expected.to_lowercase(),
                ""
            )
            .unwrap()
        );
    }

    #[test]
    fn sha512_hashes_salt_before_password() {
        // SHA-512("SALTjakejake"): salt first, then the password.
        let expected = "E1CF0C50DB2A1CB343A81F0DB690A20956190FF2F4723AE4F594EEDD1B19434F\
                        40C57538049699B869B4EC943C4BC606464A1C64C5833D113FFDC464AA50DDE7";
        assert!(
            verify_password(PasswordScheme::SaltedSha512, "jakejake", expected, "SALT").unwrap()
        );
        // The reversed concatenation must not verify.
        assert!(
            !verify_password(PasswordScheme::SaltedSha512, "SALT", expected, "jakejake").unwrap()
        );
    }

    #[test]
    fn sha512_rejects_wrong_password_and_wrong_salt() {
        let stored = hash_password(PasswordScheme::SaltedSha512, "jakejake").unwrap();
        assert!(
            !verify_password(
                PasswordScheme::SaltedSha512,
                "jakejak",
                &stored.hash,
                &stored.salt
            )
            .unwrap()
        );
        assert!(
            !verify_password(PasswordScheme::SaltedSha512, "jakejake", &stored.hash, "00")
                .unwrap()
        );
    }

    #[test]
    fn salts_are_unique_per_hash() {
        let a = hash_password(PasswordScheme::SaltedSha512, "same").unwrap();
        let b = hash_password(PasswordScheme::SaltedSha512, "same").unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn sha512_truncated_hash_is_mismatch() {
        let stored = hash_password(PasswordScheme::SaltedSha512, "jakejake").unwrap();
        assert!(
            !verify_password(
                PasswordScheme::SaltedSha512,
                "jakejake",
                &stored.hash[..64],
                &stored.salt
            )
            .unwrap()
        );
    }

    #[test]
    fn sha512_non_hex_hash_is_error() {
        let result = verify_password(PasswordScheme::SaltedSha512, "x", "not-hex", "");
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[test]
    fn bcrypt_round_trip() {
        let stored = hash_password(PasswordScheme::Bcrypt, "jakejake").unwrap();
        assert!(stored.salt.is_empty());
        assert!(verify_password(PasswordScheme::Bcrypt, "jakejake", &stored.hash, "").unwrap());
        assert!(!verify_password(PasswordScheme::Bcrypt, "nope", &stored.hash, "").unwrap());
    }

    #[test]
    fn scheme_parses_from_config_strings() {
        assert_eq!(
            "sha512".parse::<PasswordScheme>().unwrap(),
            PasswordScheme::SaltedSha512
        );
        assert_eq!(
            " BCRYPT ".parse::<PasswordScheme>().unwrap(),
            PasswordScheme::Bcrypt
        );
        assert!("md5".parse::<PasswordScheme>().is_err());
    }

    #[tokio::test]
    async fn blocking_verify_matches_sync_verify() {
        let stored = hash_password(PasswordScheme::SaltedSha512, "jakejake").unwrap();
        let ok = verify_password_blocking(
            PasswordScheme::SaltedSha512,
            "jakejake".into(),
            stored.hash,
            stored.salt,
        )
        .await
        .unwrap();
        assert!(ok);
    }

    #[test]
    fn dummy_bcrypt_is_well_formed() {
        let dummy = dummy_password(PasswordScheme::Bcrypt).expect("bcrypt dummy");
        assert!(dummy.hash.starts_with(&format!("$2b${BCRYPT_COST}$")));
        assert_eq!(dummy.hash.len(), 60);
        // Verifying against it runs a full bcrypt round and simply fails.
        assert!(!verify_password(PasswordScheme::Bcrypt, "jakejake", &dummy.hash, "").unwrap());
    }

    #[test]
    fn dummy_sha512_has_real_row_shape() {
        let dummy = dummy_password(PasswordScheme::SaltedSha512).expect("sha512 dummy");
        assert_eq!(dummy.hash.len(), 128);
        assert_eq!(dummy.salt.len(), SALT_LEN * 2);
        assert!(
            !verify_password(
                PasswordScheme::SaltedSha512,
                "jakejake",
                &dummy.hash,
                &dummy.salt
            )
            .unwrap()
        );
    }

    #[tokio::test]
    async fn dummy_verification_succeeds_for_both_schemes() {
        for scheme in [PasswordScheme::SaltedSha512, PasswordScheme::Bcrypt] {
            verify_dummy_blocking(scheme, "anything".into()).await.unwrap();
        }
    }
}
