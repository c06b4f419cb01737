//! Account and streak endpoints

use axum::{extract::State, http::StatusCode, Extension, Json};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::auth::{hash_password, issue_token, verify_password};
use crate::services::dates::local_today;
use crate::AppState;

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let (Some(name), Some(email), Some(password)) =
        (required(req.name), required(req.email), req.password.filter(|p| !p.is_empty()))
    else {
        return Err(ApiError::BadRequest("All fields are required".to_string()));
    };

    let email = email.to_lowercase();
    if state.db.get_user_by_email(&email).await?.is_some() {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let password_hash = hash_password(&password)?;
    let user = state.db.create_user(&name, &email, &password_hash).await?;

    tracing::info!(user_id = user.id, "Registered new user");

    let token = issue_token(
        user.id,
        &user.email,
        user.is_premium,
        &user.plan_type,
        &state.config.jwt,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            token,
            user: user.to_public(),
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let (Some(email), Some(password)) = (required(req.email), req.password.filter(|p| !p.is_empty()))
    else {
        return Err(ApiError::BadRequest("Email and password are required".to_string()));
    };

    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

    let user = state
        .db
        .get_user_by_email(&email.to_lowercase())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&password, &user.password_hash)? {
        return Err(invalid());
    }

    let token = issue_token(
        user.id,
        &user.email,
        user.is_premium,
        &user.plan_type,
        &state.config.jwt,
    )?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: user.to_public(),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<PublicUser>> {
    let user = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", auth.user_id))?;

    Ok(Json(user.to_public()))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(Extension(auth): Extension<AuthenticatedUser>) -> Json<MessageResponse> {
    tracing::debug!(user_id = auth.user_id, "User logged out");
    Json(MessageResponse::new("Logged out successfully"))
}

/// POST /api/user/update-streak
pub async fn update_streak(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<StreakResponse>> {
    let update = state
        .streak
        .record_engagement(&state.db, auth.user_id, local_today())
        .await?;

    Ok(Json(update.into()))
}
