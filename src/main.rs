use std::io;
use std::sync::Arc;

use catalog_service::middleware::auth::SharedSecretPolicy;
use catalog_service::{build_server, create_pool, run_migrations, AppState, Config};
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pool = create_pool(
        &config.database_url(),
        config.postgres_max_connections,
        config.statement_timeout(),
    )
    .map_err(|e| io::Error::new(io::ErrorKind::ConnectionRefused, e))?;
    run_migrations(&pool).map_err(io::Error::other)?;

    log::info!(
        "Starting server at http://{}:{}",
        config.http_host,
        config.http_port
    );

    let auth = Arc::new(SharedSecretPolicy::new(config.auth_secret.clone()));
    build_server(AppState::new(pool), auth, &config.http_host, config.http_port)?.await
}
