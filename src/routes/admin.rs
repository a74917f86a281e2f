use actix_web::{web, HttpResponse};

use crate::configuration::Platform;
use crate::error::AppError;
use crate::middleware::Hits;
use crate::store::UserStore;

/// GET /admin/metrics
pub async fn metrics(hits: web::Data<Hits>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(format!("Hits: {}", hits.get()))
}

/// POST /admin/reset
///
/// Delete every user (and their refresh tokens) and zero the hit counter.
/// Only available on the `dev` platform.
pub async fn reset(
    platform: web::Data<Platform>,
    users: web::Data<dyn UserStore>,
    hits: web::Data<Hits>,
) -> Result<HttpResponse, AppError> {
    if **platform != Platform::Dev {
        return Err(AppError::Forbidden(
            "This endpoint is not available in production".to_string(),
        ));
    }

    users.delete_all_users().await?;
    hits.reset();

    tracing::warn!("All users deleted and metrics reset");
    Ok(HttpResponse::Ok().body("Reset"))
}
