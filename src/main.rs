//! eCFR Analyzer — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ecfr_analyzer::analysis::AnalysisService;
use ecfr_analyzer::api::{self, AppState};
use ecfr_analyzer::config::AppConfig;
use ecfr_analyzer::ecfr::EcfrClient;
use ecfr_analyzer::metrics::Metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ecfr_analyzer=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::load()?;
    let metrics = Metrics::init();

    let client = EcfrClient::new(&cfg.api_base_url)?;
    let service = AnalysisService::new(Arc::new(client), cfg.history_months);
    let state = AppState {
        service: Arc::new(service),
    };

    let router = api::create_router_with_ui(state, cfg.ui_dir.as_deref()).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!(addr = %cfg.bind_addr, upstream = %cfg.api_base_url, "listening");
    axum::serve(listener, router).await?;

    Ok(())
}
