//! Embedder — the text → vector capability every semantic score depends on.
//!
//! Backends:
//! - `FastEmbedder` (default): local all-MiniLM-L6-v2 via fastembed, loaded once per process.
//! - `HttpEmbedder`: any OpenAI-compatible `/embeddings` endpoint.
//!
//! `AppState` holds an `Arc<dyn Embedder>` built once in `main`, and the pipeline
//! receives it as an argument, never through a global.

use async_trait::async_trait;
use thiserror::Error;

pub mod http;
pub mod local;

pub use http::HttpEmbedder;
pub use local::FastEmbedder;

/// Dense vector for one text. Dimensionality is fixed by the backend (384 for MiniLM).
pub type Embedding = Vec<f32>;

#[derive(Debug, Error)]
pub enum EmbedderError {
    #[error("embedder unavailable: {0}")]
    Unavailable(String),

    #[error("embedder returned malformed output: {0}")]
    Malformed(String),
}

/// Implement this to plug in a new embedding backend without touching the pipeline.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Short backend name, reported by `/health` and in logs.
    fn name(&self) -> &str;

    /// Embeds every text, returning one vector per input in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedderError>;
}

/// Embeds a single text.
pub async fn embed_one(embedder: &dyn Embedder, text: &str) -> Result<Embedding, EmbedderError> {
    let mut vectors = embedder.embed(&[text.to_string()]).await?;
    if vectors.len() != 1 {
        return Err(EmbedderError::Malformed(format!(
            "expected 1 embedding, got {}",
            vectors.len()
        )));
    }
    Ok(vectors.remove(0))
}

/// Checks that a backend returned exactly one vector per input.
pub(crate) fn expect_count(
    vectors: Vec<Embedding>,
    expected: usize,
) -> Result<Vec<Embedding>, EmbedderError> {
    if vectors.len() == expected {
        Ok(vectors)
    } else {
        Err(EmbedderError::Malformed(format!(
            "expected {expected} embeddings, got {}",
            vectors.len()
        )))
    }
}

/// Deterministic in-process embedders for tests.
#[cfg(test)]
pub mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    /// Counts of `a`–`z` and `0`–`9`: similar wording gives similar vectors,
    /// the empty string gives the zero vector.
    #[derive(Default)]
    pub struct CharFrequencyEmbedder {
        pub calls: AtomicUsize,
        pub texts_seen: AtomicUsize,
    }

    impl CharFrequencyEmbedder {
        pub fn vector_for(text: &str) -> Embedding {
            let mut v = vec![0.0_f32; 36];
            for c in text.chars() {
                if c.is_ascii_lowercase() {
                    v[(c as u8 - b'a') as usize] += 1.0;
                } else if c.is_ascii_digit() {
                    v[26 + (c as u8 - b'0') as usize] += 1.0;
                }
            }
            v
        }

        pub fn texts_seen(&self) -> usize {
            self.texts_seen.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Embedder for CharFrequencyEmbedder {
        fn name(&self) -> &str {
            "char-frequency"
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.texts_seen.fetch_add(texts.len(), Ordering::SeqCst);
            Ok(texts.iter().map(|t| Self::vector_for(t)).collect())
        }
    }

    /// Always fails, like a model service that is down.
    pub struct UnavailableEmbedder;

    #[async_trait]
    impl Embedder for UnavailableEmbedder {
        fn name(&self) -> &str {
            "unavailable"
        }

        async fn embed(&self, _texts: &[String]) -> Result<Vec<Embedding>, EmbedderError> {
            Err(EmbedderError::Unavailable("connection refused".to_string()))
        }
    }

    /// Works for the job description, fails for any text containing `marker`.
    pub struct FailOnMarkerEmbedder {
        pub marker: &'static str,
    }

    #[async_trait]
    impl Embedder for FailOnMarkerEmbedder {
        fn name(&self) -> &str {
            "fail-on-marker"
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedderError> {
            if texts.iter().any(|t| t.contains(self.marker)) {
                return Err(EmbedderError::Unavailable("model crashed".to_string()));
            }
            Ok(texts.iter().map(|t| CharFrequencyEmbedder::vector_for(t)).collect())
        }
    }

    /// Rejects empty input the way OpenAI-compatible endpoints answer it (400).
    #[derive(Default)]
    pub struct RejectEmptyEmbedder {
        pub texts_seen: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for RejectEmptyEmbedder {
        fn name(&self) -> &str {
            "reject-empty"
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedderError> {
            self.texts_seen.fetch_add(texts.len(), Ordering::SeqCst);
            if texts.iter().any(|t| t.trim().is_empty()) {
                return Err(EmbedderError::Unavailable(
                    "status 400: '$.input' is invalid".to_string(),
                ));
            }
            Ok(texts.iter().map(|t| CharFrequencyEmbedder::vector_for(t)).collect())
        }
    }

    /// Sleeps before answering for any text containing `marker`.
    /// `finished` counts the slow calls that ran to completion.
    pub struct SlowOnMarkerEmbedder {
        pub marker: &'static str,
        pub delay: Duration,
        pub finished: AtomicUsize,
    }

    impl SlowOnMarkerEmbedder {
        pub fn new(marker: &'static str, delay: Duration) -> Self {
            Self {
                marker,
                delay,
                finished: AtomicUsize::new(0),
            }
        }

        pub fn finished(&self) -> usize {
            self.finished.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Embedder for SlowOnMarkerEmbedder {
        fn name(&self) -> &str {
            "slow-on-marker"
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedderError> {
            if texts.iter().any(|t| t.contains(self.marker)) {
                tokio::time::sleep(self.delay).await;
                self.finished.fetch_add(1, Ordering::SeqCst);
            }
            Ok(texts.iter().map(|t| CharFrequencyEmbedder::vector_for(t)).collect())
        }
    }
}
