use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, PreferencesRequest, PublicUser, SignInRequest, SignOutRequest,
            SignOutResponse, SignUpRequest, UpsertUserRequest,
        },
        extractors::{BearerToken, SessionUser},
        repo_types::{Session, User},
        services::{self, hash_password, is_valid_email, verify_password},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .route("/auth/signout", post(sign_out))
        .route("/auth/upsert", post(upsert_user))
        .route("/auth/me", get(current_user))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/preferences", put(update_preferences))
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(mut payload): Json<SignUpRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }

    // Fast path; the insert below still catches the race where two sign-ups
    // with the same email pass this lookup concurrently.
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::DuplicateEmail);
    }

    let hash = hash_password(&payload.password)?;
    let user =
        User::create(&state.db, &payload.email, payload.name.as_deref(), Some(hash.as_str()))
            .await
            .map_err(|e| ApiError::on_unique_violation(e, ApiError::DuplicateEmail))?;
    let session =
        services::issue_session(&state.db, user.id, state.config.session_ttl_days).await?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok(Json(AuthResponse {
        session_token: session.token,
        user_id: user.id,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(mut payload): Json<SignInRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let Some(user) = User::find_by_email(&state.db, &payload.email).await? else {
        warn!(email = %payload.email, "sign-in unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    // Upsert-only accounts have no password hash and cannot sign in this way.
    let Some(hash) = user.password_hash.as_deref() else {
        warn!(user_id = %user.id, "sign-in against passwordless account");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&payload.password, hash)? {
        warn!(user_id = %user.id, "sign-in invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    // Prior sessions stay valid; a fresh token is minted per sign-in.
    let session =
        services::issue_session(&state.db, user.id, state.config.session_ttl_days).await?;

    info!(user_id = %user.id, email = %user.email, "user signed in");
    Ok(Json(AuthResponse {
        session_token: session.token,
        user_id: user.id,
        user: PublicUser::from(&user),
    }))
}

/// Idempotent: unknown tokens still report success.
#[instrument(skip(state, payload))]
pub async fn sign_out(
    State(state): State<AppState>,
    Json(payload): Json<SignOutRequest>,
) -> Result<Json<SignOutResponse>, ApiError> {
    let removed = Session::delete_by_token(&state.db, &payload.session_token).await?;
    if removed > 0 {
        info!("session revoked");
    }
    Ok(Json(SignOutResponse { success: true }))
}

/// Returns the current user, or null when the token is absent, unknown or
/// expired.
#[instrument(skip(state, token))]
pub async fn current_user(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Option<PublicUser>>, ApiError> {
    let user = services::current_user(&state.db, token.as_deref()).await?;
    Ok(Json(user))
}

#[instrument(skip(user))]
pub async fn get_me(SessionUser(user): SessionUser) -> Result<Json<PublicUser>, ApiError> {
    Ok(Json(PublicUser::from(&user)))
}

/// Create-or-update for accounts coming from social auth: no password is
/// set. A bearer token is only required when one is presented.
#[instrument(skip(state, token, payload))]
pub async fn upsert_user(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(mut payload): Json<UpsertUserRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    if let Some(token) = token.as_deref() {
        services::authenticate(&state.db, token).await?;
    }

    let user = User::upsert(&state.db, &payload.email, payload.name.as_deref()).await?;
    info!(user_id = %user.id, "user upserted");
    Ok(Json(PublicUser::from(&user)))
}

#[instrument(skip(state, user, payload))]
pub async fn update_preferences(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Json(payload): Json<PreferencesRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let value = serde_json::to_value(&payload).map_err(|e| ApiError::Internal(e.into()))?;
    let user = User::set_preferences(&state.db, user.id, value)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    info!(user_id = %user.id, "preferences updated");
    Ok(Json(PublicUser::from(&user)))
}
