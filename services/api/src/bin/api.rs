//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{InMemorySessionStore, OpenAiInsightAdapter},
    config::Config,
    error::ApiError,
    web::{api_router, rest::ApiDoc, state::AppState},
};
use axum::{
    http::{header::{ACCEPT, CONTENT_TYPE}, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| ApiError::Internal(format!("Failed to initialise logging: {}", e)))?;
    info!("Configuration loaded. Starting server...");

    // --- 2. Prepare the Session Store ---
    let store = if config.seed_sample_sessions {
        InMemorySessionStore::seeded()
    } else {
        InMemorySessionStore::new()
    };
    let store = Arc::new(store);
    info!("Session store ready.");

    // --- 3. Initialize the Insight Adapter ---
    if config.insight_api_key.is_none() {
        warn!("No GEMINI_API_KEY or API_KEY set; insight requests will return the fallback.");
    }
    let insight_adapter = Arc::new(OpenAiInsightAdapter::new(
        reqwest::Client::new(),
        &config.insight_api_base,
        config.insight_api_key.clone(),
        config.insight_model.clone(),
    ));
    info!(
        "Insight adapter using model {} at {}",
        config.insight_model, config.insight_api_base
    );

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(store, insight_adapter, config.clone()));

    // --- 5. Create the Web Router ---
    let cors = CorsLayer::new()
        .allow_origin(config.cors_allowed_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    let app = Router::new()
        .merge(api_router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
