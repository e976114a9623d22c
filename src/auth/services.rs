use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use lazy_static::lazy_static;
use rand::{rngs::OsRng, RngCore};
use regex::Regex;
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tracing::{debug, error};
use uuid::Uuid;

use crate::auth::dto::PublicUser;
use crate::auth::repo_types::{Session, User};
use crate::error::ApiError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// 256 bits from the OS random source, hex-encoded.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Mint a session for the user. Existing sessions for the same user stay
/// valid; each device gets its own token.
pub async fn issue_session(db: &PgPool, user_id: Uuid, ttl_days: i64) -> anyhow::Result<Session> {
    let token = generate_session_token();
    let expires_at = OffsetDateTime::now_utc() + Duration::days(ttl_days);
    let session = Session::insert(db, &token, user_id, expires_at).await?;
    debug!(user_id = %user_id, "session issued");
    Ok(session)
}

/// Resolve a bearer token to a live user, or `NotAuthenticated`.
/// An expired row found here is deleted on the spot.
pub async fn authenticate(db: &PgPool, token: &str) -> Result<User, ApiError> {
    let Some(session) = Session::find_by_token(db, token).await? else {
        return Err(ApiError::NotAuthenticated);
    };
    if session.is_expired(OffsetDateTime::now_utc()) {
        Session::delete_by_token(db, token).await?;
        debug!(user_id = %session.user_id, "expired session removed on lookup");
        return Err(ApiError::NotAuthenticated);
    }
    let Some(user) = User::find_by_id(db, session.user_id).await? else {
        return Err(ApiError::NotAuthenticated);
    };
    Ok(user)
}

/// Nullable variant of [`authenticate`] for the current-user read: an
/// absent, unknown or expired token yields `None` rather than an error.
pub async fn current_user(
    db: &PgPool,
    token: Option<&str>,
) -> Result<Option<PublicUser>, ApiError> {
    let Some(token) = token else {
        return Ok(None);
    };
    match authenticate(db, token).await {
        Ok(user) => Ok(Some(PublicUser::from(&user))),
        Err(ApiError::NotAuthenticated) => Ok(None),
        Err(e) => Err(e),
    }
}


#[cfg(test)]
mod token_tests {
    use super::*;

    #[test]
    fn token_is_64_hex_chars() {
        let token = generate_session_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_distinct() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
    }
}

#[cfg(test)]
mod email_tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email(""));
    }
}
