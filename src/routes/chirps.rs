/// Chirp Routes
///
/// Short posts authored by the holder of a valid access token.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, DatabaseError, ErrorContext, ValidationError};
use crate::middleware::AuthenticatedUser;
use crate::store::{ChirpRecord, ChirpStore};
use crate::validators::is_valid_chirp_body;

#[derive(Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

#[derive(Serialize)]
pub struct ChirpResponse {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub body: String,
    pub user_id: String,
}

impl From<&ChirpRecord> for ChirpResponse {
    fn from(chirp: &ChirpRecord) -> Self {
        Self {
            id: chirp.id.to_string(),
            created_at: chirp.created_at.to_rfc3339(),
            updated_at: chirp.updated_at.to_rfc3339(),
            body: chirp.body.clone(),
            user_id: chirp.user_id.to_string(),
        }
    }
}

/// POST /api/chirps
///
/// **Requires valid JWT access token**; the author is the token's subject.
///
/// # Errors
/// - 400: Empty body or longer than 140 characters
/// - 401: Missing or invalid token (handled by middleware)
/// - 404: Author no longer exists
pub async fn create_chirp(
    principal: web::ReqData<AuthenticatedUser>,
    form: web::Json<CreateChirpRequest>,
    chirps: web::Data<dyn ChirpStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("chirp_create");
    let AuthenticatedUser(user_id) = principal.into_inner();

    let body = is_valid_chirp_body(&form.body)?;
    let chirp = chirps.create_chirp(user_id, &body).await?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = %user_id,
        chirp_id = %chirp.id,
        "Chirp created"
    );

    Ok(HttpResponse::Created().json(ChirpResponse::from(&chirp)))
}

/// GET /api/chirps
pub async fn list_chirps(chirps: web::Data<dyn ChirpStore>) -> Result<HttpResponse, AppError> {
    let chirps = chirps.list_chirps().await?;
    let body: Vec<ChirpResponse> = chirps.iter().map(ChirpResponse::from).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/chirps/{chirp_id}
///
/// # Errors
/// - 400: `chirp_id` is not a UUID
/// - 404: No such chirp
pub async fn get_chirp(
    path: web::Path<String>,
    chirps: web::Data<dyn ChirpStore>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = Uuid::parse_str(&path.into_inner())
        .map_err(|_| ValidationError::InvalidFormat("chirp id".to_string()))?;

    let chirp = chirps
        .find_chirp_by_id(chirp_id)
        .await?
        .ok_or_else(|| AppError::Database(DatabaseError::NotFound("chirp".to_string())))?;

    Ok(HttpResponse::Ok().json(ChirpResponse::from(&chirp)))
}
