//! Recommendation generator: LLM advice for a scored match, with a
//! deterministic fallback when the model is unavailable or misbehaves.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::embeddings::truncate_chars;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{complete_json, ChatCompleter, LlmError};
use crate::matching::prompts::{RECOMMENDATION_PROMPT_TEMPLATE, RECOMMENDATION_SYSTEM};

/// Prefix of resume / JD text included in the prompt.
pub const MAX_PROMPT_EXCERPT_CHARS: usize = 1500;
/// Upper bound on the words returned to the caller.
pub const MAX_RECOMMENDATION_WORDS: usize = 150;

const RECOMMENDATION_MAX_TOKENS: u32 = 400;
/// Skills interpolated into fallback text.
const FALLBACK_SKILL_COUNT: usize = 3;

/// Strict schema of the model's reply.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecommendationPayload {
    recommendations: String,
}

/// Everything the generator needs about one scored match.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationInput<'a> {
    pub resume_text: &'a str,
    pub job_description: &'a str,
    pub matched_skills: &'a [String],
    pub missing_skills: &'a [String],
    pub match_score: f64,
}

#[derive(Clone)]
pub struct RecommendationGenerator {
    llm: Arc<dyn ChatCompleter>,
    temperature: f32,
}

impl RecommendationGenerator {
    pub fn new(llm: Arc<dyn ChatCompleter>, temperature: f32) -> Self {
        Self { llm, temperature }
    }

    /// Never fails: any LLM problem yields the tiered fallback text.
    pub async fn generate(&self, input: RecommendationInput<'_>) -> String {
        match self.request(&input).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Recommendation LLM call failed, using fallback: {e}");
                fallback_recommendation(input.match_score, input.matched_skills, input.missing_skills)
            }
        }
    }

    async fn request(&self, input: &RecommendationInput<'_>) -> Result<String, LlmError> {
        let prompt = build_prompt(input);
        let payload: RecommendationPayload = complete_json(
            self.llm.as_ref(),
            &prompt,
            RECOMMENDATION_SYSTEM,
            RECOMMENDATION_MAX_TOKENS,
            self.temperature,
        )
        .await?;

        let text = payload.recommendations.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        debug!("Recommendation generated ({} chars)", text.len());
        Ok(clip_words(text, MAX_RECOMMENDATION_WORDS))
    }
}

fn build_prompt(input: &RecommendationInput<'_>) -> String {
    let score = format!("{:.1}", input.match_score);
    let matched = join_or_none(input.matched_skills);
    let missing = join_or_none(input.missing_skills);
    fill_template(
        RECOMMENDATION_PROMPT_TEMPLATE,
        &[
            ("match_score", score.as_str()),
            ("matched_skills", matched.as_str()),
            ("missing_skills", missing.as_str()),
            ("resume", truncate_chars(input.resume_text, MAX_PROMPT_EXCERPT_CHARS)),
            (
                "job_description",
                truncate_chars(input.job_description, MAX_PROMPT_EXCERPT_CHARS),
            ),
        ],
    )
}

fn join_or_none(skills: &[String]) -> String {
    if skills.is_empty() {
        "none".to_string()
    } else {
        skills.join(", ")
    }
}

/// Keeps the first `max_words` words, appending an ellipsis when cut.
fn clip_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return words.join(" ");
    }
    format!("{}...", words[..max_words].join(" "))
}

/// Canned advice by score tier (≥80 / ≥60 / below).
pub fn fallback_recommendation(score: f64, matched: &[String], missing: &[String]) -> String {
    let top_missing: Vec<&str> = missing
        .iter()
        .take(FALLBACK_SKILL_COUNT)
        .map(String::as_str)
        .collect();
    let top_matched: Vec<&str> = matched
        .iter()
        .take(FALLBACK_SKILL_COUNT)
        .map(String::as_str)
        .collect();

    let strengths = if top_matched.is_empty() {
        "your transferable experience".to_string()
    } else {
        top_matched.join(", ")
    };

    if score >= 80.0 {
        let mut text = format!(
            "Strong match ({score:.1}/100). Lead your application with {strengths} and quantify the impact of that work."
        );
        if !top_missing.is_empty() {
            text.push_str(&format!(
                " Briefly address {} to remove any remaining doubt.",
                top_missing.join(", ")
            ));
        }
        text
    } else if score >= 60.0 {
        let gaps = if top_missing.is_empty() {
            "the role's less prominent requirements".to_string()
        } else {
            top_missing.join(", ")
        };
        format!(
            "Good potential match ({score:.1}/100). Highlight {strengths} prominently, and build hands-on evidence of {gaps} through a focused project or certification."
        )
    } else {
        let gaps = if top_missing.is_empty() {
            "the core requirements of this role".to_string()
        } else {
            top_missing.join(", ")
        };
        format!(
            "Limited match ({score:.1}/100). Focus on developing {gaps} before applying, and tailor your resume to show how {strengths} transfers to this position."
        )
    }
}
