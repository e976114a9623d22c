use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::SessionUser,
    error::ApiError,
    onboarding::{
        dto::{
            FitnessProfile, Goals, Measurements, OnboardingData, PersonalInfo, UpdateStepRequest,
        },
        repo, services,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/onboarding", get(get_onboarding))
        .route("/onboarding/step", put(update_step))
        .route("/onboarding/personal-info", put(update_personal_info))
        .route("/onboarding/fitness-profile", put(update_fitness_profile))
        .route("/onboarding/measurements", put(update_measurements))
        .route("/onboarding/goals", put(update_goals))
        .route("/onboarding/complete", post(complete_onboarding))
}

fn to_value<T: serde::Serialize>(doc: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(doc).map_err(|e| ApiError::Internal(e.into()))
}

#[instrument(skip_all)]
pub async fn get_onboarding(
    SessionUser(user): SessionUser,
) -> Result<Json<OnboardingData>, ApiError> {
    Ok(Json(services::onboarding_data(&user)))
}

/// Wizard navigation. The step must be in range; ordering is not enforced
/// so the client can jump back or resume anywhere.
#[instrument(skip(state, user))]
pub async fn update_step(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Json(payload): Json<UpdateStepRequest>,
) -> Result<Json<OnboardingData>, ApiError> {
    if !(1..=4).contains(&payload.step) {
        warn!(step = payload.step, "step out of range");
        return Err(ApiError::InvalidStepNumber(payload.step));
    }

    let user = repo::set_step(&state.db, user.id, payload.step)
        .await?
        .ok_or(ApiError::UserNotFound)?;
    Ok(Json(services::onboarding_data(&user)))
}

#[instrument(skip(state, user, payload))]
pub async fn update_personal_info(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Json(payload): Json<PersonalInfo>,
) -> Result<Json<OnboardingData>, ApiError> {
    if payload.height <= 0.0 {
        return Err(ApiError::Validation("Height must be positive".into()));
    }

    let user = repo::set_personal_info(&state.db, user.id, to_value(&payload)?)
        .await?
        .ok_or(ApiError::UserNotFound)?;
    info!(user_id = %user.id, "personal info saved");
    Ok(Json(services::onboarding_data(&user)))
}

#[instrument(skip(state, user, payload))]
pub async fn update_fitness_profile(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Json(payload): Json<FitnessProfile>,
) -> Result<Json<OnboardingData>, ApiError> {
    if payload.preferred_workout_types.is_empty() {
        return Err(ApiError::Validation(
            "Select at least one workout type".into(),
        ));
    }
    if payload.available_equipment.is_empty() {
        return Err(ApiError::Validation(
            "Select at least one equipment option".into(),
        ));
    }

    let user = repo::set_fitness_profile(&state.db, user.id, to_value(&payload)?)
        .await?
        .ok_or(ApiError::UserNotFound)?;
    info!(user_id = %user.id, "fitness profile saved");
    Ok(Json(services::onboarding_data(&user)))
}

/// BMI is derived here from the submitted weight and the height/units
/// stored in step 1; a client-supplied value is overwritten.
#[instrument(skip(state, user, payload))]
pub async fn update_measurements(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Json(mut payload): Json<Measurements>,
) -> Result<Json<OnboardingData>, ApiError> {
    if payload.weight <= 0.0 {
        return Err(ApiError::Validation("Weight must be positive".into()));
    }

    payload.bmi = services::parse_personal_info(&user)
        .map(|info| services::calculate_bmi(payload.weight, info.height, info.units));

    let user = repo::set_measurements(&state.db, user.id, to_value(&payload)?)
        .await?
        .ok_or(ApiError::UserNotFound)?;
    info!(user_id = %user.id, "measurements saved");
    Ok(Json(services::onboarding_data(&user)))
}

/// Final step: stores the goals and marks the wizard completed.
#[instrument(skip(state, user, payload))]
pub async fn update_goals(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Json(payload): Json<Goals>,
) -> Result<Json<OnboardingData>, ApiError> {
    if !(1..=10).contains(&payload.motivation_level) {
        return Err(ApiError::Validation(
            "Motivation level must be between 1 and 10".into(),
        ));
    }

    let user = repo::set_goals(&state.db, user.id, to_value(&payload)?)
        .await?
        .ok_or(ApiError::UserNotFound)?;
    info!(user_id = %user.id, "goals saved, onboarding completed");
    Ok(Json(services::onboarding_data(&user)))
}

/// Idempotent explicit completion, for clients that finish the wizard
/// without resubmitting goals.
#[instrument(skip(state, user))]
pub async fn complete_onboarding(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> Result<Json<OnboardingData>, ApiError> {
    let user = repo::complete(&state.db, user.id)
        .await?
        .ok_or(ApiError::UserNotFound)?;
    info!(user_id = %user.id, "onboarding completed");
    Ok(Json(services::onboarding_data(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::User;
    use crate::onboarding::dto::{PrimaryGoal, TargetTimeframe};
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            name: None,
            password_hash: None,
            onboarding_step: 1,
            onboarding_completed: false,
            personal_info: None,
            fitness_profile: None,
            measurements: None,
            goals: None,
            preferences: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn update_step_rejects_out_of_range() {
        for step in [0, 5, -1] {
            let err = update_step(
                State(AppState::fake()),
                SessionUser(test_user()),
                Json(UpdateStepRequest { step }),
            )
            .await
            .unwrap_err();
            assert!(matches!(err, ApiError::InvalidStepNumber(s) if s == step));
        }
    }

    #[tokio::test]
    async fn update_goals_rejects_motivation_out_of_scale() {
        for level in [0u8, 11] {
            let goals = Goals {
                primary_goal: PrimaryGoal::GeneralHealth,
                target_weight: None,
                target_timeframe: TargetTimeframe::Ongoing,
                motivation_level: level,
                specific_targets: None,
                weekly_goals: None,
            };
            let err = update_goals(
                State(AppState::fake()),
                SessionUser(test_user()),
                Json(goals),
            )
            .await
            .unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn update_measurements_rejects_nonpositive_weight() {
        let m = Measurements {
            weight: 0.0,
            body_fat_percentage: None,
            muscle_mass: None,
            bmi: None,
            body_type: None,
            progress_photos: None,
            circumference: None,
        };
        let err = update_measurements(
            State(AppState::fake()),
            SessionUser(test_user()),
            Json(m),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn get_onboarding_reports_stored_wizard_state() {
        let mut user = test_user();
        user.onboarding_step = 2;
        let Json(data) = get_onboarding(SessionUser(user)).await.unwrap();
        assert_eq!(data.current_step, 2);
        assert!(!data.is_completed);
        assert_eq!(data.completion_percentage, 0.0);
    }
}
