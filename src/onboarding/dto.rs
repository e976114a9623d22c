use serde::{Deserialize, Serialize};

/// Measurement units chosen during step 1 and reused for BMI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkoutFrequency {
    #[serde(rename = "1-2")]
    OneToTwo,
    #[serde(rename = "3-4")]
    ThreeToFour,
    #[serde(rename = "5-6")]
    FiveToSix,
    #[serde(rename = "daily")]
    Daily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkoutDuration {
    #[serde(rename = "15-30")]
    Short,
    #[serde(rename = "30-45")]
    Medium,
    #[serde(rename = "45-60")]
    Long,
    #[serde(rename = "60+")]
    Extended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    Strength,
    Cardio,
    Flexibility,
    Sports,
    Functional,
    Bodyweight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    None,
    Dumbbells,
    Barbell,
    ResistanceBands,
    Kettlebells,
    PullUpBar,
    GymAccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutLocation {
    Home,
    Gym,
    Outdoor,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    Ectomorph,
    Mesomorph,
    Endomorph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryGoal {
    LoseWeight,
    GainMuscle,
    ImproveEndurance,
    IncreaseStrength,
    ImproveFlexibility,
    MaintainFitness,
    SportSpecific,
    GeneralHealth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetTimeframe {
    #[serde(rename = "1_month")]
    OneMonth,
    #[serde(rename = "3_months")]
    ThreeMonths,
    #[serde(rename = "6_months")]
    SixMonths,
    #[serde(rename = "1_year")]
    OneYear,
    #[serde(rename = "ongoing")]
    Ongoing,
}

/// Step 1: personal information. `height` is cm or inches per `units`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub gender: Gender,
    pub height: f64,
    pub units: Units,
}

/// Step 2: fitness preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessProfile {
    pub experience_level: ExperienceLevel,
    pub workout_frequency: WorkoutFrequency,
    pub workout_duration: WorkoutDuration,
    pub preferred_workout_types: Vec<WorkoutType>,
    pub available_equipment: Vec<Equipment>,
    pub workout_location: WorkoutLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyCircumference {
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hips: Option<f64>,
    pub biceps: Option<f64>,
    pub thighs: Option<f64>,
}

/// Step 3: body measurements. `weight` is kg or lb per the units stored in
/// step 1. `bmi` is derived server-side, never trusted from the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub weight: f64,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub bmi: Option<f64>,
    pub body_type: Option<BodyType>,
    pub progress_photos: Option<Vec<String>>,
    pub circumference: Option<BodyCircumference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyGoals {
    pub workout_sessions: u32,
    pub target_calories: Option<u32>,
    pub step_count: Option<u32>,
}

/// Step 4: fitness goals. `motivation_level` is a 1-10 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    pub primary_goal: PrimaryGoal,
    pub target_weight: Option<f64>,
    pub target_timeframe: TargetTimeframe,
    pub motivation_level: u8,
    pub specific_targets: Option<Vec<String>>,
    pub weekly_goals: Option<WeeklyGoals>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStepRequest {
    pub step: i32,
}

/// Full wizard state returned by every onboarding read and write, so the
/// client always has a confirmed view of the stored data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingData {
    pub personal_info: Option<PersonalInfo>,
    pub fitness_profile: Option<FitnessProfile>,
    pub measurements: Option<Measurements>,
    pub goals: Option<Goals>,
    pub current_step: i32,
    pub is_completed: bool,
    pub completion_percentage: f32,
}
