mod classifier;
mod config;
mod errors;
mod models;
mod routes;
mod screening;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::classifier::ModelBundle;
use crate::config::Config;
use crate::routes::build_router;
use crate::screening::fit_scoring::KeywordFitScorer;
use crate::screening::taxonomy::Taxonomy;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Keyword taxonomy: built-in lists unless TAXONOMY_PATH points at a file
    let taxonomy = match &config.taxonomy_path {
        Some(path) => Taxonomy::load(path)?,
        None => Taxonomy::default(),
    };
    let fit_scorer = Arc::new(KeywordFitScorer::new(Arc::new(taxonomy)));
    info!(
        "Taxonomy '{}' loaded: {} skills",
        fit_scorer.taxonomy().version(),
        fit_scorer.taxonomy().skills().len()
    );

    // Pre-trained category model. Missing or inconsistent artifacts stop startup.
    let classifier = ModelBundle::load(&config.vectorizer_path, &config.classifier_path)?;

    // Build app state
    let state = AppState {
        config: config.clone(),
        classifier: Arc::new(classifier),
        fit_scorer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
