mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::models::Role;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    log::info!("🚀 Starting Wallet Identity Service...");

    // Initialize MongoDB connection (creates the unique (walletId, role) index)
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    log::info!("✅ MongoDB connected successfully");

    // Collection handle construído uma vez e injetado nos handlers
    let user_store = web::Data::new(db.user_store());

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    HttpServer::new(move || {
        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PATCH", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT,
            ])
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(user_store.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Auth: pública, única rota antes do guard
            .route("/api/v1/auth", web::post().to(api::auth::authenticate))
            // Profile: tudo aqui dentro exige bearer token
            .service(
                web::scope("/api/v1/profile")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("", web::get().to(api::profile::get_profile))
                    .service(
                        web::resource("/talent")
                            .wrap(middleware::role::RoleGuard::new(Role::Talent))
                            .route(web::patch().to(api::profile::update_talent_profile)),
                    )
                    .service(
                        web::resource("/employee")
                            .wrap(middleware::role::RoleGuard::new(Role::Employee))
                            .route(web::patch().to(api::profile::update_employee_profile)),
                    ),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
