use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{guard, middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::configuration::{ApplicationSettings, JwtSettings};
use crate::error::{AppError, ValidationError};
use crate::middleware::{HitCounter, Hits, JwtMiddleware};
use crate::routes::{
    create_chirp, create_user, get_chirp, get_current_user, health_check, list_chirps, login,
    metrics, refresh, reset, revoke,
};
use crate::store::{ChirpStore, RefreshTokenStore, UserStore};

pub fn run(
    listener: TcpListener,
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    chirps: Arc<dyn ChirpStore>,
    jwt_config: JwtSettings,
    application: ApplicationSettings,
) -> Result<Server, std::io::Error> {
    let users = web::Data::from(users);
    let refresh_tokens = web::Data::from(refresh_tokens);
    let chirps = web::Data::from(chirps);
    let secret = jwt_config.secret.clone();
    let jwt_config = web::Data::new(jwt_config);
    let platform = web::Data::new(application.platform);
    let hits = web::Data::new(Hits::new());
    let static_dir = application.static_dir;

    let server = HttpServer::new(move || {
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            tracing::debug!("Rejected request body: {}", err);
            AppError::Validation(ValidationError::MalformedBody).into()
        });

        App::new()
            .wrap(Logger::default())

            // Shared state
            .app_data(json_config)
            .app_data(users.clone())
            .app_data(refresh_tokens.clone())
            .app_data(chirps.clone())
            .app_data(jwt_config.clone())
            .app_data(platform.clone())
            .app_data(hits.clone())

            // Public routes
            .route("/api/healthz", web::get().to(health_check))
            .route("/api/users", web::post().to(create_user))
            .route("/api/login", web::post().to(login))
            .route("/api/refresh", web::post().to(refresh))
            .route("/api/revoke", web::post().to(revoke))

            // Protected routes (require a valid access token)
            .service(
                web::resource("/api/me")
                    .wrap(JwtMiddleware::new(&secret))
                    .route(web::get().to(get_current_user)),
            )
            .service(
                web::resource("/api/chirps")
                    .guard(guard::Post())
                    .wrap(JwtMiddleware::new(&secret))
                    .route(web::post().to(create_chirp)),
            )

            // Public reads; GET falls through the POST-guarded resource above
            .route("/api/chirps", web::get().to(list_chirps))
            .route("/api/chirps/{chirp_id}", web::get().to(get_chirp))

            .route("/admin/metrics", web::get().to(metrics))
            .route("/admin/reset", web::post().to(reset))

            // Static file serving, counted
            .service(
                web::scope("/app")
                    .wrap(HitCounter::new(hits.get_ref().clone()))
                    .service(fs::Files::new("/", static_dir.as_str()).index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
