use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use eventos_server::config::Config;
use eventos_server::repository::mysql::create_pool;
use eventos_server::repository::MySqlEventRepository;
use eventos_server::routes::create_routes;
use eventos_server::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,eventos_server=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let pool = create_pool(&config)
        .await
        .expect("Failed to connect to database");

    tracing::info!(
        host = %config.db_host,
        database = %config.db_name,
        "Successfully connected to database"
    );

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    let state = AppState::new(Arc::new(MySqlEventRepository::new(pool)));
    let app = create_routes(state, &config.cors_allowed_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
