//! Semantic similarity between whole documents.

use tracing::warn;

use crate::embeddings::{truncate_chars, Embedder};

/// Prefix of each document sent to the embedding provider.
pub const MAX_EMBED_CHARS: usize = 4000;

/// Cosine similarity in [-1, 1]. Zero-norm inputs and mismatched dimensions
/// yield 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Similarity scaled to 0–100; anti-correlated documents score 0.
pub fn similarity_to_score(sim: f64) -> f64 {
    sim.clamp(0.0, 1.0) * 100.0
}

/// Embeds both documents concurrently and scores their similarity.
/// Embedding failure degrades to 0 with a warning.
pub async fn semantic_score(embedder: &dyn Embedder, resume_text: &str, job_text: &str) -> f64 {
    let resume = truncate_chars(resume_text, MAX_EMBED_CHARS);
    let job = truncate_chars(job_text, MAX_EMBED_CHARS);

    let (resume_vec, job_vec) = tokio::join!(embedder.embed(resume), embedder.embed(job));

    match (resume_vec, job_vec) {
        (Ok(a), Ok(b)) => similarity_to_score(cosine_similarity(&a, &b)),
        (Err(e), _) | (_, Err(e)) => {
            warn!(
                "Embedding via '{}' failed, semantic score defaults to 0: {e}",
                embedder.name()
            );
            0.0
        }
    }
}
