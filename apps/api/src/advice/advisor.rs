//! Retrieval-augmented career advice over a single resume.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::advice::prompts::{CAREER_ADVICE_PROMPT, NO_CONTEXT};
use crate::embeddings::{truncate_chars, Embedder, EmbeddingError, EmbeddingVector};
use crate::llm_client::prompts::{fill_template, CAREER_PERSONA};
use crate::llm_client::{ChatCompleter, LlmError};
use crate::matching::semantic::cosine_similarity;

pub const CHUNK_CHARS: usize = 500;
pub const CHUNK_OVERLAP: usize = 100;
pub const MAX_CHUNKS: usize = 16;
pub const TOP_K: usize = 3;
/// Prefix of the resume included verbatim in the prompt.
const MAX_PROMPT_RESUME_CHARS: usize = 3000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerAdvice {
    pub answer: String,
    pub relevant_context: Vec<String>,
}

pub struct CareerAdvisor {
    embedder: Arc<dyn Embedder>,
    llm: Arc<dyn ChatCompleter>,
    max_tokens: u32,
    temperature: f32,
}

impl CareerAdvisor {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn ChatCompleter>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            embedder,
            llm,
            max_tokens,
            temperature,
        }
    }

    /// Answers `query` about the resume. Retrieval problems only cost the
    /// excerpts; an LLM failure is returned to the caller.
    pub async fn advise(&self, query: &str, resume_text: &str) -> Result<CareerAdvice, LlmError> {
        let relevant_context = match self.retrieve(query, resume_text).await {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!("Context retrieval via {} failed: {e}", self.embedder.name());
                Vec::new()
            }
        };

        let prompt = build_prompt(query, resume_text, &relevant_context);
        let answer = self
            .llm
            .complete(&prompt, CAREER_PERSONA, self.max_tokens, self.temperature)
            .await?;

        let answer = answer.trim().to_string();
        if answer.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        Ok(CareerAdvice {
            answer,
            relevant_context,
        })
    }

    /// Top `TOP_K` resume chunks by cosine similarity to the query.
    async fn retrieve(&self, query: &str, resume_text: &str) -> Result<Vec<String>, EmbeddingError> {
        let chunks = chunk_text(resume_text, CHUNK_CHARS, CHUNK_OVERLAP, MAX_CHUNKS);
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let mut tasks = JoinSet::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let embedder = Arc::clone(&self.embedder);
            let chunk = chunk.clone();
            tasks.spawn(async move { (idx, embedder.embed(&chunk).await) });
        }
        let query_vec = self.embedder.embed(query).await?;

        let mut vectors: Vec<Option<EmbeddingVector>> = vec![None; chunks.len()];
        while let Some(joined) = tasks.join_next().await {
            let (idx, result) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("Chunk embedding task aborted: {e}");
                    continue;
                }
            };
            vectors[idx] = Some(result?);
        }

        let mut scored: Vec<(usize, f64)> = vectors
            .iter()
            .enumerate()
            .filter_map(|(idx, v)| v.as_ref().map(|v| (idx, cosine_similarity(&query_vec, v))))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        debug!("Ranked {} resume chunks for advice", scored.len());
        Ok(scored
            .into_iter()
            .take(TOP_K)
            .map(|(idx, _)| chunks[idx].clone())
            .collect())
    }
}

/// Splits `text` into windows of `size` characters, each starting
/// `size - overlap` characters after the previous one, keeping at most
/// `max_chunks`. Blank windows are skipped.
pub fn chunk_text(text: &str, size: usize, overlap: usize, max_chunks: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let step = size.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() && chunks.len() < max_chunks {
        let end = (start + size).min(chars.len());
        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }
    chunks
}

fn build_prompt(query: &str, resume_text: &str, context: &[String]) -> String {
    let context = if context.is_empty() {
        NO_CONTEXT.to_string()
    } else {
        context.join("\n\n")
    };
    fill_template(
        CAREER_ADVICE_PROMPT,
        &[
            ("context", context.as_str()),
            ("resume", truncate_chars(resume_text, MAX_PROMPT_RESUME_CHARS)),
            ("query", query),
        ],
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::embeddings::HashEmbedder;

    /// Records the last prompt and answers with a fixed reply.
    struct RecordingLlm {
        reply: Result<String, ()>,
        last_prompt: Mutex<Option<String>>,
    }

    impl RecordingLlm {
        fn answering(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                last_prompt: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                last_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ChatCompleter for RecordingLlm {
        async fn complete(&self, prompt: &str, _: &str, _: u32, _: f32) -> Result<String, LlmError> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            self.reply.clone().map_err(|_| LlmError::EmptyContent)
        }
    }

    struct BrokenEmbedder;

    #[async_trait]
    impl Embedder for BrokenEmbedder {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn dimension(&self) -> usize {
            8
        }

        async fn embed(&self, _: &str) -> Result<EmbeddingVector, EmbeddingError> {
            Err(EmbeddingError::Empty)
        }
    }

    fn resume() -> String {
        let mut text = "Led Kubernetes migrations and built Terraform modules for AWS. ".repeat(10);
        text.push_str(&"Mentored junior engineers and ran hiring loops for the platform team. ".repeat(10));
        text.push_str(&"Wrote Python data pipelines with Airflow and Spark on EMR. ".repeat(10));
        text
    }

    #[test]
    fn test_chunk_windows_overlap() {
        let text: String = ('a'..='z').cycle().take(1200).collect();
        let chunks = chunk_text(&text, 500, 100, 16);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 500);
        // second window starts 400 characters in
        assert_eq!(&chunks[0][400..], &chunks[1][..100]);
        assert_eq!(chunks[2].chars().count(), 400);
    }

    #[test]
    fn test_chunk_count_capped() {
        let text = "x".repeat(50_000);
        assert_eq!(chunk_text(&text, 500, 100, MAX_CHUNKS).len(), MAX_CHUNKS);
    }

    #[test]
    fn test_chunk_short_and_empty_text() {
        assert_eq!(chunk_text("short resume", 500, 100, 16), vec!["short resume"]);
        assert!(chunk_text("   ", 500, 100, 16).is_empty());
        assert!(chunk_text("", 500, 100, 16).is_empty());
    }

    #[test]
    fn test_placeholders_in_context_stay_literal() {
        let context = vec!["Built a {query} parser and a {resume} linter".to_string()];
        let prompt = build_prompt("UNIQUE-QUESTION", "UNIQUE-RESUME", &context);
        assert_eq!(prompt.matches("UNIQUE-QUESTION").count(), 1);
        assert_eq!(prompt.matches("UNIQUE-RESUME").count(), 1);
        assert!(prompt.contains("Built a {query} parser and a {resume} linter"));
    }

    #[tokio::test]
    async fn test_advice_includes_top_chunks() {
        let llm = Arc::new(RecordingLlm::answering("  Aim for a staff platform role.  "));
        let advisor = CareerAdvisor::new(Arc::new(HashEmbedder::new(384)), llm.clone(), 500, 0.3);

        let advice = advisor
            .advise("Which Kubernetes and Terraform roles fit me?", &resume())
            .await
            .unwrap();

        assert_eq!(advice.answer, "Aim for a staff platform role.");
        assert_eq!(advice.relevant_context.len(), TOP_K);
        assert!(advice.relevant_context[0].contains("Kubernetes"));

        let prompt = llm.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains(&advice.relevant_context[0]));
        assert!(prompt.contains("Which Kubernetes and Terraform roles fit me?"));
    }

    #[tokio::test]
    async fn test_retrieval_failure_degrades_to_no_context() {
        let llm = Arc::new(RecordingLlm::answering("Keep going."));
        let advisor = CareerAdvisor::new(Arc::new(BrokenEmbedder), llm.clone(), 500, 0.3);

        let advice = advisor.advise("What next?", &resume()).await.unwrap();
        assert!(advice.relevant_context.is_empty());

        let prompt = llm.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains(NO_CONTEXT));
    }

    #[tokio::test]
    async fn test_llm_failure_is_returned() {
        let advisor = CareerAdvisor::new(
            Arc::new(HashEmbedder::new(64)),
            Arc::new(RecordingLlm::failing()),
            500,
            0.3,
        );
        assert!(advisor.advise("What next?", &resume()).await.is_err());
    }

    #[tokio::test]
    async fn test_blank_answer_is_error() {
        let advisor = CareerAdvisor::new(
            Arc::new(HashEmbedder::new(64)),
            Arc::new(RecordingLlm::answering("   ")),
            500,
            0.3,
        );
        assert!(matches!(
            advisor.advise("What next?", &resume()).await,
            Err(LlmError::EmptyContent)
        ));
    }
}
