use iris_classifier_api::{
    api::{build_router, AppState},
    config::Config,
    ml::ClassifierService,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize tracing
    init_tracing(&config);

    tracing::info!("Starting Iris Classifier API v{}", env!("CARGO_PKG_VERSION"));

    // Train the classifier once at startup; the service cannot run without it
    let classifier = Arc::new(ClassifierService::train(&config.model)?);
    tracing::info!("✅ Classifier ready");

    // Create application state for the HTTP API
    let app_state = AppState::new(classifier);
    let app = build_router(app_state);

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("🚀 HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!("   API documentation: http://{}/", http_addr);
    tracing::info!("   Browser form: http://{}/form", http_addr);
    tracing::info!("   Prediction: POST http://{}/predict", http_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let http_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(http_listener, app).await {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    tokio::select! {
        _ = http_handle => {
            tracing::warn!("HTTP server stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "iris_classifier_api={},tower_http=info",
            config.observability.log_level
        )
        .into()
    });

    if config.observability.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
