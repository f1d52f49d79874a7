//! Embedding providers.
//!
//! Services hold an `Arc<dyn Embedder>`. `HttpEmbedder` talks to an
//! OpenAI-compatible `/embeddings` endpoint; `HashEmbedder` is the offline
//! default when no embedding API key is configured.

use async_trait::async_trait;
use thiserror::Error;

pub mod hashing;
pub mod http;

pub use hashing::HashEmbedder;
pub use http::HttpEmbedder;

/// Fixed-length embedding produced by an `Embedder`.
pub type EmbeddingVector = Vec<f32>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Provider returned no embedding")]
    Empty,

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Short backend label for logs.
    fn name(&self) -> &'static str;

    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError>;
}

/// Returns the longest prefix of `text` holding at most `max_chars` characters.
/// Always cuts on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
