use crate::auth::repo_types::{Session, User};
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

pub(crate) const USER_COLUMNS: &str = "id, email, name, password_hash, onboarding_step, \
     onboarding_completed, personal_info, fitness_profile, measurements, goals, preferences, \
     created_at, updated_at";

impl User {
    /// Find a user by (already lowercased) email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    /// Create a new user. `password_hash` is None for upsert-only accounts.
    pub async fn create(
        db: &PgPool,
        email: &str,
        name: Option<&str>,
        password_hash: Option<&str>,
    ) -> sqlx::Result<User> {
        let sql = format!(
            "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(name)
            .bind(password_hash)
            .fetch_one(db)
            .await?;
        Ok(user)
    }

    /// Create a passwordless account, or patch the name of an existing one.
    pub async fn upsert(db: &PgPool, email: &str, name: Option<&str>) -> sqlx::Result<User> {
        let sql = format!(
            "INSERT INTO users (email, name) VALUES ($1, $2) \
             ON CONFLICT (email) DO UPDATE \
             SET name = COALESCE(EXCLUDED.name, users.name), updated_at = now() \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(name)
            .fetch_one(db)
            .await?;
        Ok(user)
    }

    pub async fn set_preferences(
        db: &PgPool,
        id: Uuid,
        preferences: serde_json::Value,
    ) -> sqlx::Result<Option<User>> {
        let sql = format!(
            "UPDATE users SET preferences = $2, updated_at = now() WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(preferences)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }
}

impl Session {
    pub async fn insert(
        db: &PgPool,
        token: &str,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> sqlx::Result<Session> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, token, user_id, expires_at, created_at
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(db)
        .await?;
        Ok(session)
    }

    pub async fn find_by_token(db: &PgPool, token: &str) -> sqlx::Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, token, user_id, expires_at, created_at
            FROM sessions
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(db)
        .await?;
        Ok(session)
    }

    /// Delete the session matching the token. Returns the number of rows
    /// removed; zero for unknown tokens, so sign-out stays idempotent.
    pub async fn delete_by_token(db: &PgPool, token: &str) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }

    /// Remove all sessions past their expiry.
    pub async fn delete_expired(db: &PgPool) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
