/// User Routes
///
/// Account creation and the authenticated user's own record.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, validate_password_strength};
use crate::error::{AppError, DatabaseError, ErrorContext};
use crate::middleware::AuthenticatedUser;
use crate::store::{UserRecord, UserStore};
use crate::validators::is_valid_email;

/// User registration request
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
}

/// Public fields of a user. Never includes the credential hash.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&UserRecord> for UserResponse {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

/// POST /api/users
///
/// Register a new user with email and password.
///
/// # Validation
/// - Email must be valid format and not already registered
/// - Password must be 8+ chars with digit, lowercase, and uppercase
///
/// # Errors
/// - 400: Validation errors (invalid email/password)
/// - 409: Email already registered (duplicate)
/// - 500: Internal server error
pub async fn create_user(
    form: web::Json<CreateUserRequest>,
    users: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");

    let email = is_valid_email(&form.email)?;
    validate_password_strength(&form.password)?;
    let hashed_password = hash_password(&form.password)?;

    let user = users.create_user(&email, &hashed_password).await?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = %user.id,
        "User registered successfully"
    );

    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// GET /api/me
///
/// Get current authenticated user's information.
/// **Requires valid JWT access token** in Authorization header.
///
/// # Errors
/// - 401: Missing or invalid token (handled by middleware)
/// - 404: User no longer exists
pub async fn get_current_user(
    principal: web::ReqData<AuthenticatedUser>,
    users: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let AuthenticatedUser(user_id) = principal.into_inner();

    let user = users
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Database(DatabaseError::NotFound("user".to_string())))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}
