use axum::{routing::get, Router};
use kindred::{
    db::{DatabaseConfig, PgStore},
    get_db_pool,
    handlers::{api_router, AppState},
    services::{ConnectionService, KeywordCatalogue, RecommendationEngine},
    utils, Config,
};
use tower::ServiceBuilder;
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};
use axum::http::{HeaderValue, Method};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::init_logging();

    let config = Config::from_env()?;
    let db_config = DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;

    // Run migrations
    kindred::db::migrations::run_migrations(&pool).await?;

    let catalogue = KeywordCatalogue::load(config.keyword_catalogue_path.as_deref())?;
    let engine = RecommendationEngine::new(catalogue);
    let state = AppState {
        connections: ConnectionService::new(PgStore::new(pool), engine),
    };

    let port = config.port;
    let app = create_router(state, &config);

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Server running on port {}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(state: AppState<PgStore>, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(api_router(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(config)),
        )
}

fn create_cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .filter_map(|origin| {
            let trimmed = origin.trim();
            if !trimmed.is_empty() {
                trimmed.parse().ok()
            } else {
                None
            }
        })
        .collect();

    if origins.is_empty() {
        // Default to permissive for development
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

async fn health_check() -> &'static str {
    "OK"
}
