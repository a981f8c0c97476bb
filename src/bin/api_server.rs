// src/bin/api_server.rs

use country_rates_cache::infra::config::AppConfig;
use country_rates_cache::infra::telemetry;
use country_rates_cache::transport;
use country_rates_cache::AppContext;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    telemetry::init_tracing(config.log_format);

    // --- Context Initialization (store, sources, refresh pipeline) ---
    tracing::info!(backend = ?config.storage_backend, cache_dir = ?config.cache_dir, "initializing application context");
    let ctx = AppContext::initialize(config).await?;

    // --- API Server Initialization ---
    let app = transport::http::create_router(transport::http::AppState::from(&ctx))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()));
    let addr = ctx.config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("API server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutdown signal received");
        })
        .await?;

    ctx.shutdown().await;
    tracing::info!("graceful shutdown complete");
    Ok(())
}
