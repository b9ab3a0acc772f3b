// Tradepost API server
// Decision: no ambient globals — the signing secret, token TTL, and user
// directory are constructed once here and injected into each component

mod auth;
mod config;
mod error;
mod services;
#[cfg(test)]
mod test_support;
mod users;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tradepost_storage::{Database, UserDirectory};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::routes::register_user,
        auth::routes::login_user,
        users::get_me,
        users::get_user,
    ),
    components(
        schemas(
            tradepost_contracts::User,
            tradepost_contracts::CreateUserRequest,
            tradepost_contracts::LoginUserRequest,
            tradepost_contracts::LoginUserResponse,
            tradepost_contracts::ErrorResponse,
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "User lookup endpoints")
    ),
    info(
        title = "Tradepost API",
        version = "0.1.0",
        description = "Marketplace API with token and API-key authentication",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

/// Assemble the application router (extracted for testing)
fn api_router(auth_state: auth::AuthState, users_state: users::AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth::routes(auth_state.clone()))
        .merge(users::routes(users_state, auth_state));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tradepost_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("tradepost-api starting...");

    // Load .env for local development; production sets variables directly
    dotenvy::dotenv().ok();

    let config = config::AppConfig::from_env().context("failed to load configuration")?;
    tracing::info!(
        app_env = %config.app_env,
        port = config.http_port,
        "Configuration loaded"
    );

    // Initialize database
    let db = Database::from_url(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    db.migrate()
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Connected to database");

    let directory: Arc<dyn UserDirectory> = Arc::new(db);

    // Authentication state: secret and TTL are injected, never read
    // ambiently by the auth core
    let auth_state = auth::AuthState::new(directory.clone(), &config.jwt_secret, config.token_ttl)
        .context("failed to initialize authentication")?;
    tracing::info!(
        token_ttl_secs = config.token_ttl.as_secs(),
        "Authentication configured"
    );

    let users_state = users::AppState::new(directory);

    let app = api_router(auth_state, users_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
