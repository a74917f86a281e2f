/// Authentication Routes
///
/// Login, access token renewal and refresh token revocation.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{
    generate_refresh_token, get_bearer_token, make_access_token, revoke_refresh_token,
    save_refresh_token, validate_refresh_token, verify_password,
};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, ErrorContext};
use crate::routes::users::UserResponse;
use crate::store::{RefreshTokenStore, UserStore};

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: the user's public fields plus both tokens
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

/// Access token renewal response
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/login
///
/// Authenticate user with email and password.
/// Returns an access token and a new refresh token on success.
///
/// # Errors
/// - 400: Malformed body
/// - 401: Invalid credentials (email not found or wrong password)
/// - 500: Internal server error
///
/// # Security Notes
/// - Uses same error message for "not found" and "wrong password"
pub async fn login(
    form: web::Json<LoginRequest>,
    users: web::Data<dyn UserStore>,
    refresh_tokens: web::Data<dyn RefreshTokenStore>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let user = users
        .find_user_by_email(form.email.trim())
        .await?
        .ok_or(AppError::Auth(AuthError::InvalidCredentials))?;

    verify_password(&form.password, &user.hashed_password)?;

    let access_token = make_access_token(user.id, &jwt_config.secret, jwt_config.access_token_ttl())?;
    let refresh_token = generate_refresh_token()?;

    save_refresh_token(
        refresh_tokens.get_ref(),
        user.id,
        &refresh_token,
        jwt_config.refresh_token_ttl(),
    )
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = %user.id,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: UserResponse::from(&user),
        token: access_token,
        refresh_token,
    }))
}

/// POST /api/refresh
///
/// Issue a fresh access token for the refresh token in
/// `Authorization: Bearer <refresh_token>`. The refresh token itself is
/// not rotated.
///
/// # Errors
/// - 401: Missing/malformed header, or unknown, expired or revoked refresh token
/// - 500: Internal server error
pub async fn refresh(
    req: HttpRequest,
    refresh_tokens: web::Data<dyn RefreshTokenStore>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let refresh_token = get_bearer_token(req.headers())?;
    let user_id = validate_refresh_token(refresh_tokens.get_ref(), &refresh_token).await?;
    let access_token = make_access_token(user_id, &jwt_config.secret, jwt_config.access_token_ttl())?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = %user_id,
        "Access token refreshed"
    );

    Ok(HttpResponse::Ok().json(TokenResponse {
        token: access_token,
    }))
}

/// POST /api/revoke
///
/// Revoke the refresh token in `Authorization: Bearer <refresh_token>`.
///
/// # Errors
/// - 401: Missing/malformed header, unknown or already expired refresh token
/// - 500: Internal server error
pub async fn revoke(
    req: HttpRequest,
    refresh_tokens: web::Data<dyn RefreshTokenStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_revoke");

    let refresh_token = get_bearer_token(req.headers())?;
    revoke_refresh_token(refresh_tokens.get_ref(), &refresh_token).await?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        "Refresh token revoked by client"
    );

    Ok(HttpResponse::NoContent().finish())
}
