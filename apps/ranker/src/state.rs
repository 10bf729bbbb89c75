use std::sync::Arc;

use crate::config::Config;
use crate::embedder::Embedder;
use crate::ranking::settings::ScoringConfig;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built once at startup; every ranking run shares it.
    pub embedder: Arc<dyn Embedder>,
    /// The canonical scoring constants, shared read-only with every run.
    pub scoring: Arc<ScoringConfig>,
}

impl AppState {
    pub fn new(config: Config, embedder: Arc<dyn Embedder>) -> Self {
        let scoring = Arc::new(config.scoring.clone());
        Self {
            config,
            embedder,
            scoring,
        }
    }
}
