use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tower_http::cors::CorsLayer;

use reifegrad::api::{SessionRegistry, session_routes, spawn_expiry_task};
use reifegrad::catalog::maturity_catalog;
use reifegrad::config::AppConfig;
use reifegrad::llm::create_provider;
use reifegrad::narrative::LlmNarrativeGenerator;
use reifegrad::sink::create_sink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    eprintln!("📊 KI-Reifegrad Analyse v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   API: http://0.0.0.0:{}/api/sessions", config.port);

    let catalog = Arc::new(maturity_catalog());
    let llm = create_provider(&config);
    let generator = Arc::new(LlmNarrativeGenerator::new(llm, Arc::clone(&catalog)));
    let sink = create_sink(Arc::clone(&catalog), config.webhook_url.as_deref());

    let registry = Arc::new(SessionRegistry::new(catalog, generator, sink));
    let _expiry_handle = spawn_expiry_task(
        Arc::clone(&registry),
        config.session_idle,
        Duration::from_secs(60),
    );
    let app = session_routes(registry).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "Questionnaire server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await
        .context("Server error")?;

    Ok(())
}
