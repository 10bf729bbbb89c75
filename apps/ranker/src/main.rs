mod config;
mod documents;
mod embedder;
mod errors;
mod models;
mod ranking;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, EmbedderConfig};
use crate::embedder::{Embedder, FastEmbedder, HttpEmbedder};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ranker v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the embedder once; every ranking run shares it
    let embedder = build_embedder(&config.embedder).await?;
    info!("Embedder initialized (backend: {})", embedder.name());

    info!(
        "Scoring: {} skills, {:?} matching, bonus {}/year capped at {}",
        config.scoring.vocabulary.len(),
        config.scoring.skill_match,
        config.scoring.experience_bonus_per_year,
        config.scoring.experience_bonus_cap
    );

    let state = AppState::new(config.clone(), embedder);

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

/// Constructs the configured embedding backend. The local model is loaded here
/// unless lazy loading was requested.
async fn build_embedder(config: &EmbedderConfig) -> Result<Arc<dyn Embedder>> {
    match config {
        EmbedderConfig::FastEmbed {
            cache_dir,
            eager_load,
        } => {
            let embedder = FastEmbedder::new(cache_dir.clone());
            if *eager_load {
                embedder.warm_up().await?;
            }
            Ok(Arc::new(embedder))
        }
        EmbedderConfig::Http {
            url,
            model,
            api_key,
            timeout,
        } => {
            info!("Using remote embedder at {url} (model: {model})");
            let embedder = HttpEmbedder::new(url.clone(), model.clone(), api_key.clone(), *timeout)?;
            Ok(Arc::new(embedder))
        }
    }
}
