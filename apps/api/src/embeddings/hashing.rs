//! Deterministic feature-hashing embedder.
//!
//! Unigram and bigram tokens are hashed into signed buckets and the result is
//! L2-normalized. Needs no model and no network, so identical text always
//! yields an identical vector.

use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use siphasher::sip::SipHasher13;

use super::{Embedder, EmbeddingError, EmbeddingVector};

// Changing either key changes every vector this embedder produces.
const HASH_KEY_0: u64 = 0x0123_4567_89ab_cdef;
const HASH_KEY_1: u64 = 0xfedc_ba98_7654_3210;

const BIGRAM_WEIGHT: f32 = 0.5;

pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash(token: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_KEY_0, HASH_KEY_1);
        token.hash(&mut hasher);
        hasher.finish()
    }

    fn add_token(&self, vector: &mut [f32], token: &str, weight: f32) {
        let h = Self::hash(token);
        let idx = (h % self.dimension as u64) as usize;
        // top bit picks the sign so collisions tend to cancel out
        let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
        vector[idx] += sign * weight;
    }

    pub fn embed_sync(&self, text: &str) -> EmbeddingVector {
        let tokens = tokenize(text);
        let mut vector = vec![0.0f32; self.dimension];

        for token in &tokens {
            self.add_token(&mut vector, token, 1.0);
        }
        for pair in tokens.windows(2) {
            self.add_token(&mut vector, &format!("{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        Ok(self.embed_sync(text))
    }
}

/// Lowercased alphanumeric tokens; `+`, `#` and `.` stay inside tokens so
/// "c++", "c#" and "node.js" survive.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|t| t.trim_matches('.'))
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_embedding_has_configured_dimension() {
        let embedder = HashEmbedder::new(384);
        assert_eq!(embedder.embed_sync("rust engineer").len(), 384);
    }

    #[test]
    fn test_embedding_is_deterministic() {
        let embedder = HashEmbedder::new(64);
        assert_eq!(
            embedder.embed_sync("Senior Python developer"),
            embedder.embed_sync("Senior Python developer")
        );
    }

    #[test]
    fn test_embedding_is_unit_length() {
        let v = HashEmbedder::new(128).embed_sync("kubernetes docker terraform aws");
        assert!((dot(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_yields_zero_vector() {
        let v = HashEmbedder::new(16).embed_sync("   ");
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_related_texts_closer_than_unrelated() {
        let e = HashEmbedder::new(384);
        let resume = e.embed_sync("python developer with django and postgresql experience");
        let related = e.embed_sync("looking for a python django developer, postgresql a plus");
        let unrelated = e.embed_sync("registered nurse for night shifts in pediatric ward");
        assert!(dot(&resume, &related) > dot(&resume, &unrelated));
    }

    #[test]
    fn test_tokenize_keeps_language_symbols() {
        assert_eq!(tokenize("C++, C# and Node.js."), vec!["c++", "c#", "and", "node.js"]);
    }

    #[test]
    fn test_dimension_floor_is_one() {
        assert_eq!(HashEmbedder::new(0).dimension(), 1);
    }
}
