use crate::{
    db::DUPLICATE_EMAIL_MESSAGE,
    error::AppError,
    middleware::auth::{create_token, AuthUser},
    models::user::*,
    routes::{ApiJson, AppState},
    services::password::{is_valid_email, validate_password},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn issue_token(user: &User, secret: &str) -> Result<String, AppError> {
    create_token(&user.id, &user.email, secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Trimmed value, or `None` when missing or blank.
fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    // Validate input
    let (Some(name), Some(_), Some(password)) =
        (required(&req.name), required(&req.email), req.password.as_deref())
    else {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    };
    if password.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    // 형식 검사는 입력 그대로, 저장은 정규화한 값으로
    let raw_email = req.email.as_deref().unwrap_or_default();
    if !is_valid_email(raw_email) {
        return Err(AppError::BadRequest("Please enter a valid email address".to_string()));
    }
    let email = normalize_email(raw_email);
    validate_password(password).map_err(|message| AppError::BadRequest(message.to_string()))?;

    // Cheap pre-check; the store enforces uniqueness again on insert
    if state.store.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
    }

    let password_hash = state.passwords.hash(password.to_string()).await?;

    let user = state
        .store
        .users
        .insert(User {
            id: uuid::Uuid::now_v7().to_string(),
            name: name.to_string(),
            email,
            password_hash,
            created_at: Utc::now(),
        })
        .await?;

    let token = issue_token(&user, &state.jwt_secret)?;
    tracing::info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (Some(email), Some(password)) = (required(&req.email), req.password.as_deref()) else {
        return Err(AppError::BadRequest("Email and password are required".to_string()));
    };
    if password.is_empty() {
        return Err(AppError::BadRequest("Email and password are required".to_string()));
    }

    // Unknown email and wrong password get the same answer and the same hashing cost
    let Some(user) = state.store.users.find_by_email(&normalize_email(email)).await? else {
        state.passwords.verify_dummy(password.to_string()).await?;
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let verified = state
        .passwords
        .verify(password.to_string(), user.password_hash.clone())
        .await?;
    if !verified {
        tracing::warn!("Failed login for user {}", user.id);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = issue_token(&user, &state.jwt_secret)?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .store
        .users
        .find_by_id(&auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}
