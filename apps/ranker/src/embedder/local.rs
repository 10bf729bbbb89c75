use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use once_cell::sync::OnceCell;
use tracing::info;

use super::{expect_count, Embedder, EmbedderError, Embedding};

/// Local sentence embedder (all-MiniLM-L6-v2, 384 dimensions).
///
/// The ONNX model is loaded at most once, on first use or by `warm_up`. Loading
/// and inference are blocking and run on tokio's blocking pool.
#[derive(Clone)]
pub struct FastEmbedder {
    model: Arc<OnceCell<TextEmbedding>>,
    cache_dir: Option<PathBuf>,
}

impl FastEmbedder {
    pub fn new(cache_dir: Option<PathBuf>) -> Self {
        Self {
            model: Arc::new(OnceCell::new()),
            cache_dir,
        }
    }

    /// Loads the model now instead of on the first request.
    pub async fn warm_up(&self) -> Result<(), EmbedderError> {
        let model = self.model.clone();
        let cache_dir = self.cache_dir.clone();
        tokio::task::spawn_blocking(move || load(&model, cache_dir).map(|_| ()))
            .await
            .map_err(|e| EmbedderError::Unavailable(format!("model loader panicked: {e}")))?
    }
}

fn load(
    cell: &OnceCell<TextEmbedding>,
    cache_dir: Option<PathBuf>,
) -> Result<&TextEmbedding, EmbedderError> {
    cell.get_or_try_init(|| {
        info!("Loading embedding model {:?}", EmbeddingModel::AllMiniLML6V2);
        let mut options =
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }
        let model = TextEmbedding::try_new(options)
            .map_err(|e| EmbedderError::Unavailable(format!("failed to load model: {e}")))?;
        info!("Embedding model loaded");
        Ok(model)
    })
}

#[async_trait]
impl Embedder for FastEmbedder {
    fn name(&self) -> &str {
        "fastembed/all-MiniLM-L6-v2"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.model.clone();
        let cache_dir = self.cache_dir.clone();
        let texts = texts.to_vec();
        let expected = texts.len();

        let vectors = tokio::task::spawn_blocking(move || {
            load(&model, cache_dir)?
                .embed(texts, None)
                .map_err(|e| EmbedderError::Unavailable(format!("inference failed: {e}")))
        })
        .await
        .map_err(|e| EmbedderError::Unavailable(format!("inference task panicked: {e}")))??;

        expect_count(vectors, expected)
    }
}
