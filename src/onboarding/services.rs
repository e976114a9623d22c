use serde::de::DeserializeOwned;

use crate::auth::repo_types::User;
use crate::onboarding::dto::{
    FitnessProfile, Goals, Measurements, OnboardingData, PersonalInfo, Units,
};

/// Metric: weight in kg, height in cm. Imperial: weight in lb, height in
/// inches.
pub fn calculate_bmi(weight: f64, height: f64, units: Units) -> f64 {
    match units {
        Units::Metric => {
            let height_m = height / 100.0;
            weight / (height_m * height_m)
        }
        Units::Imperial => (weight / (height * height)) * 703.0,
    }
}

/// A stored sub-document that no longer matches its typed shape is treated
/// as absent rather than failing the whole read.
fn parse_doc<T: DeserializeOwned>(doc: &Option<serde_json::Value>) -> Option<T> {
    doc.as_ref()
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

pub fn parse_personal_info(user: &User) -> Option<PersonalInfo> {
    parse_doc(&user.personal_info)
}

/// Whether the step's required fields are all present. Mirrors the wizard's
/// resume logic: step 3 only needs a weight, the others need their full
/// required shape (and non-empty selections for step 2).
pub fn is_step_complete(user: &User, step: i32) -> bool {
    match step {
        1 => parse_doc::<PersonalInfo>(&user.personal_info).is_some(),
        2 => parse_doc::<FitnessProfile>(&user.fitness_profile)
            .map(|p| !p.preferred_workout_types.is_empty() && !p.available_equipment.is_empty())
            .unwrap_or(false),
        3 => parse_doc::<Measurements>(&user.measurements)
            .map(|m| m.weight > 0.0)
            .unwrap_or(false),
        4 => parse_doc::<Goals>(&user.goals).is_some(),
        _ => false,
    }
}

pub fn completion_percentage(user: &User) -> f32 {
    let complete = (1..=4).filter(|step| is_step_complete(user, *step)).count();
    (complete as f32 / 4.0) * 100.0
}

pub fn onboarding_data(user: &User) -> OnboardingData {
    OnboardingData {
        personal_info: parse_doc(&user.personal_info),
        fitness_profile: parse_doc(&user.fitness_profile),
        measurements: parse_doc(&user.measurements),
        goals: parse_doc(&user.goals),
        current_step: user.onboarding_step,
        is_completed: user.onboarding_completed,
        completion_percentage: completion_percentage(user),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::dto::{
        ExperienceLevel, Gender, PrimaryGoal, TargetTimeframe, WorkoutDuration, WorkoutFrequency,
        WorkoutLocation, WorkoutType,
    };
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn blank_user() -> User {
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

    fn personal_info() -> PersonalInfo {
        PersonalInfo {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            age: 30,
            gender: Gender::Female,
            height: 175.0,
            units: Units::Metric,
        }
    }

    fn goals() -> Goals {
        Goals {
            primary_goal: PrimaryGoal::GainMuscle,
            target_weight: None,
            target_timeframe: TargetTimeframe::SixMonths,
            motivation_level: 8,
            specific_targets: None,
            weekly_goals: None,
        }
    }

    #[test]
    fn bmi_metric_reference_value() {
        let bmi = calculate_bmi(70.0, 175.0, Units::Metric);
        assert!((bmi - 22.86).abs() < 0.01, "got {bmi}");
    }

    #[test]
    fn bmi_imperial_reference_value() {
        let bmi = calculate_bmi(154.0, 69.0, Units::Imperial);
        assert!((bmi - 22.74).abs() < 0.01, "got {bmi}");
    }

    #[test]
    fn blank_user_has_zero_completion() {
        let user = blank_user();
        assert_eq!(completion_percentage(&user), 0.0);
        assert!(!is_step_complete(&user, 1));
        assert!(!is_step_complete(&user, 7));
    }

    #[test]
    fn completion_counts_only_fully_present_steps() {
        let mut user = blank_user();
        user.personal_info = Some(serde_json::to_value(personal_info()).unwrap());
        user.goals = Some(serde_json::to_value(goals()).unwrap());
        assert_eq!(completion_percentage(&user), 50.0);
    }

    #[test]
    fn fitness_profile_with_empty_selections_is_incomplete() {
        let mut user = blank_user();
        let profile = FitnessProfile {
            experience_level: ExperienceLevel::Beginner,
            workout_frequency: WorkoutFrequency::ThreeToFour,
            workout_duration: WorkoutDuration::Medium,
            preferred_workout_types: vec![],
            available_equipment: vec![],
            workout_location: WorkoutLocation::Home,
        };
        user.fitness_profile = Some(serde_json::to_value(&profile).unwrap());
        assert!(!is_step_complete(&user, 2));

        let profile = FitnessProfile {
            preferred_workout_types: vec![WorkoutType::Strength],
            available_equipment: vec![crate::onboarding::dto::Equipment::Dumbbells],
            ..profile
        };
        user.fitness_profile = Some(serde_json::to_value(&profile).unwrap());
        assert!(is_step_complete(&user, 2));
    }

    #[test]
    fn malformed_stored_doc_reads_as_absent() {
        let mut user = blank_user();
        user.personal_info = Some(serde_json::json!({ "first_name": "only" }));
        let data = onboarding_data(&user);
        assert!(data.personal_info.is_none());
        assert_eq!(data.completion_percentage, 0.0);
    }

    #[test]
    fn onboarding_data_reflects_step_and_flag() {
        let mut user = blank_user();
        user.onboarding_step = 3;
        user.onboarding_completed = false;
        let data = onboarding_data(&user);
        assert_eq!(data.current_step, 3);
        assert!(!data.is_completed);
    }
}
