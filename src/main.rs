//! Cardiograph - cardiac risk prediction service.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                       CARDIOGRAPH                         │
//! ├───────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌─────────────┐   ┌──────────────────┐  │
//! │  │  HTML Form │   │  JSON API   │   │  Risk Predictor  │  │
//! │  │  (Axum)    │   │  (Axum)     │   │  (scaler+forest) │  │
//! │  └──────┬─────┘   └──────┬──────┘   └────────┬─────────┘  │
//! │         └────────────────┴───────────────────┘            │
//! │                          ▼                                │
//! │               ┌────────────────────┐                      │
//! │               │  Model artifacts   │                      │
//! │               │  (bincode on disk) │                      │
//! │               └────────────────────┘                      │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! The model artifacts are loaded (or trained) once before the listener
//! binds; afterwards the fitted state is shared read-only with every
//! handler.

mod config;
mod error;
mod handlers;
mod model;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use model::{ModelStore, RiskPredictor};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardiograph=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Cardiograph server starting...");
    tracing::info!("Environment: {}", config.environment);

    // Load or train the model before accepting requests
    let store = ModelStore::new(&config.model_dir);
    let predictor = RiskPredictor::load_or_train(&store)?;

    // Build application state
    let state = AppState {
        predictor: Arc::new(predictor),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<RiskPredictor>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        // HTML pages
        .route("/", get(|| async { handlers::pages::index_page() }))
        .route("/about", get(|| async { handlers::pages::about_page() }))
        .route("/predict", post(handlers::predict::predict_form))
        // JSON API
        .route("/health", get(handlers::health::check))
        .route("/api/v1/predict", post(handlers::predict::api_predict))
        .route(
            "/api/v1/model/importance",
            get(handlers::predict::importance),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
