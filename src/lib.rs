pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod middleware;
pub mod openapi;
pub mod schema;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{from_fn, Logger};
use actix_web::{web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::errors::AppError;
use crate::middleware::auth::{require_auth, AuthPolicy};
use crate::middleware::cors::cors;

pub use config::Config;
pub use db::{create_pool, DbPool};
pub use state::AppState;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("applied {} pending migration(s)", applied.len());
    Ok(())
}

/// CRUD routes for all three resources, relative to wherever they are mounted.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    use handlers::{categories, orders, products};

    cfg.service(
        web::scope("/product")
            .route("", web::post().to(products::create_product))
            .route("", web::get().to(products::list_products))
            .route("/{id}", web::get().to(products::get_product))
            .route("/{id}", web::put().to(products::update_product))
            .route("/{id}", web::delete().to(products::delete_product)),
    )
    .service(
        web::scope("/category")
            .route("", web::post().to(categories::create_category))
            .route("", web::get().to(categories::list_categories))
            .route("/{id}", web::get().to(categories::get_category))
            .route("/{id}", web::put().to(categories::update_category))
            .route("/{id}", web::delete().to(categories::delete_category)),
    )
    .service(
        web::scope("/order")
            .route("", web::post().to(orders::create_order))
            .route("", web::get().to(orders::list_orders))
            .route("/{id}", web::get().to(orders::get_order))
            .route("/{id}", web::put().to(orders::update_order))
            .route("/{id}", web::delete().to(orders::delete_order)),
    );
}

/// The complete application: extractor error handling, CORS, request
/// logging, Swagger UI, and the API mounted at `/` and at `/v1`. Only the
/// `/v1` copy goes through `auth`.
pub fn app(
    state: web::Data<AppState>,
    auth: web::Data<dyn AuthPolicy>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(auth)
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
        )
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
        )
        .app_data(
            web::PathConfig::default()
                .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
        )
        .wrap(from_fn(cors))
        .wrap(Logger::default())
        .service(openapi::swagger_ui())
        .configure(api_routes)
        .service(
            web::scope("/v1")
                .wrap(from_fn(require_auth))
                .configure(api_routes),
        )
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    auth: Arc<dyn AuthPolicy>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(state);
    let auth = web::Data::from(auth);

    Ok(HttpServer::new(move || app(state.clone(), auth.clone()))
        .bind((host.to_string(), port))?
        .run())
}
