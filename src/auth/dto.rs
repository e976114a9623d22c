use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::onboarding::dto::{ExperienceLevel, Units};

/// Request body for sign-up.
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Request body for sign-in.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignOutRequest {
    pub session_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignOutResponse {
    pub success: bool,
}

/// Create-or-update request for accounts without a password (social auth).
#[derive(Debug, Deserialize)]
pub struct UpsertUserRequest {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PreferencesRequest {
    pub units: Units,
    pub fitness_level: ExperienceLevel,
}

/// Response returned after sign-up or sign-in. Carries the fresh public
/// user so the client has a confirmed view of its state immediately,
/// instead of waiting for a follow-up read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub session_token: String,
    pub user_id: Uuid,
    pub user: PublicUser,
}

/// Public part of the user returned to the client. The password hash is
/// never part of this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub onboarding_step: i32,
    pub onboarding_completed: bool,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            onboarding_step: user.onboarding_step,
            onboarding_completed: user.onboarding_completed,
        }
    }
}
