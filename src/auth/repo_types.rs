use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database. The onboarding sub-documents are stored as
/// JSONB and parsed into their typed shapes at the API boundary.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>, // None for upsert-only accounts
    pub onboarding_step: i32,
    pub onboarding_completed: bool,
    pub personal_info: Option<serde_json::Value>,
    pub fitness_profile: Option<serde_json::Value>,
    pub measurements: Option<serde_json::Value>,
    pub goals: Option<serde_json::Value>,
    pub preferences: Option<serde_json::Value>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Session record binding an opaque bearer token to a user.
/// Valid iff the current time is before `expires_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

impl Session {
    /// Whether the session is past its expiry at the given instant. A row
    /// expiring exactly now is already expired, matching the sweep's
    /// `expires_at <= now()` predicate.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}
