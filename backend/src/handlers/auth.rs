use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{
        LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RefreshResponse,
        SignupRequest, User, UserResponse,
    },
    repositories::user as user_repo,
    state::AppState,
    utils::password::{hash_password, verify_against_dummy, verify_password},
    validation::rules,
};

const INVALID_LOGIN: &str = "Invalid username or password";

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    let payload = payload.normalized();
    payload.validate()?;
    if let Err(err) =
        rules::validate_password_length(&payload.password, state.config.password_min_length)
    {
        return Err(AppError::Validation(vec![format!("password: {}", err.code)]));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = User::new(payload.username, payload.email, password_hash);

    if let Err(err) = user_repo::insert_user(&state.pool, &user).await {
        return Err(match user_repo::violated_unique_constraint(&err).as_deref() {
            Some("users_username_key") => AppError::Conflict("Username already taken".into()),
            Some("users_email_key") => AppError::Conflict("Email already registered".into()),
            _ => err.into(),
        });
    }
    tracing::info!(user_id = %user.id, "account created");

    let tokens = state.tokens.issue(user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            user: UserResponse::from(user),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let login = payload.username.trim();
    let Some(user) = user_repo::find_user_by_login(&state.pool, login).await? else {
        verify_against_dummy(&payload.password);
        return Err(AppError::Unauthorized(INVALID_LOGIN.into()));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "password mismatch");
        return Err(AppError::Unauthorized(INVALID_LOGIN.into()));
    }

    let tokens = state.tokens.issue(user.id).await?;
    Ok(Json(LoginResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        user: UserResponse::from(user),
    }))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let access_token = state.tokens.refresh(&payload.refresh_token).await?;
    Ok(Json(RefreshResponse {
        access_token,
        expires_in: state.tokens.access_ttl_seconds(),
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> Result<Json<Value>, AppError> {
    state.tokens.logout(&payload.refresh_token).await?;
    Ok(Json(json!({ "message": "Logged out" })))
}
