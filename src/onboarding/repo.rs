use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo::USER_COLUMNS;
use crate::auth::repo_types::User;

// Each step-save overwrites its sub-document and moves the step counter to
// the step after it.

pub async fn set_personal_info(
    db: &PgPool,
    user_id: Uuid,
    doc: serde_json::Value,
) -> sqlx::Result<Option<User>> {
    let sql = format!(
        "UPDATE users SET personal_info = $2, onboarding_step = 2, updated_at = now() \
         WHERE id = $1 RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .bind(doc)
        .fetch_optional(db)
        .await?;
    Ok(user)
}

pub async fn set_fitness_profile(
    db: &PgPool,
    user_id: Uuid,
    doc: serde_json::Value,
) -> sqlx::Result<Option<User>> {
    let sql = format!(
        "UPDATE users SET fitness_profile = $2, onboarding_step = 3, updated_at = now() \
         WHERE id = $1 RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .bind(doc)
        .fetch_optional(db)
        .await?;
    Ok(user)
}

pub async fn set_measurements(
    db: &PgPool,
    user_id: Uuid,
    doc: serde_json::Value,
) -> sqlx::Result<Option<User>> {
    let sql = format!(
        "UPDATE users SET measurements = $2, onboarding_step = 4, updated_at = now() \
         WHERE id = $1 RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .bind(doc)
        .fetch_optional(db)
        .await?;
    Ok(user)
}

/// The final step both stores the goals and closes the wizard.
pub async fn set_goals(
    db: &PgPool,
    user_id: Uuid,
    doc: serde_json::Value,
) -> sqlx::Result<Option<User>> {
    let sql = format!(
        "UPDATE users SET goals = $2, onboarding_step = 4, onboarding_completed = TRUE, \
         updated_at = now() WHERE id = $1 RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .bind(doc)
        .fetch_optional(db)
        .await?;
    Ok(user)
}

/// Set the wizard position directly (back-navigation, resume).
pub async fn set_step(db: &PgPool, user_id: Uuid, step: i32) -> sqlx::Result<Option<User>> {
    let sql = format!(
        "UPDATE users SET onboarding_step = $2, updated_at = now() WHERE id = $1 \
         RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .bind(step)
        .fetch_optional(db)
        .await?;
    Ok(user)
}

pub async fn complete(db: &PgPool, user_id: Uuid) -> sqlx::Result<Option<User>> {
    let sql = format!(
        "UPDATE users SET onboarding_completed = TRUE, onboarding_step = 4, updated_at = now() \
         WHERE id = $1 RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    Ok(user)
}
