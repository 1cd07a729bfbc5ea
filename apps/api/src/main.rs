use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use academia_api::api::{self, AppState};
use academia_api::config::AppConfig;
use academia_api::domain::repositories::{StudentRepository, TeamRepository};
use academia_api::infrastructure::database;
use academia_api::infrastructure::repositories::{
    InMemoryStudentRepository, InMemoryTeamRepository, PostgresStudentRepository,
    PostgresTeamRepository,
};
use academia_api::services::TeamService;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let (teams, students): (Arc<dyn TeamRepository>, Arc<dyn StudentRepository>) =
        match &config.database_url {
            Some(database_url) => {
                tracing::info!("Connecting to database...");
                let pool = database::connect(database_url, config.max_connections)
                    .await
                    .expect("Failed to connect to database");
                database::run_migrations(&pool)
                    .await
                    .expect("Failed to run migrations");
                tracing::info!("Database connected successfully");

                (
                    Arc::new(PostgresTeamRepository::new(pool.clone())),
                    Arc::new(PostgresStudentRepository::new(pool)),
                )
            }
            None => {
                tracing::warn!(
                    "DATABASE_URL not set, using in-memory storage; \
                     students must be registered through POST /api/students"
                );
                (
                    Arc::new(InMemoryTeamRepository::new()),
                    Arc::new(InMemoryStudentRepository::new()),
                )
            }
        };

    let service = TeamService::new(teams, students, config.engine.clone());

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(AppState::new(service))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    tracing::info!("Server listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}
