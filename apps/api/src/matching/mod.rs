//! Job-Match Scoring Engine.
//!
//! Single pass: normalize → match skills → embed + compare → extract
//! experience → combine → recommend. Holds no mutable state, so one
//! `JobMatcher` serves every request concurrently.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::embeddings::Embedder;
use crate::skills::SkillExtractor;

pub mod combiner;
pub mod experience;
pub mod handlers;
pub mod prompts;
pub mod recommendations;
pub mod semantic;
pub mod skill_match;

use combiner::{combine_scores, round1, ScoreWeights};
use experience::{experience_score, extract_years};
use recommendations::{RecommendationGenerator, RecommendationInput};
use semantic::semantic_score;
use skill_match::match_skills;

/// Outcome of one job-match request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// 0 – 100, one decimal
    pub match_score: f64,
    /// at most 15
    pub matched_skills: Vec<String>,
    /// at most 15
    pub missing_skills: Vec<String>,
    pub recommendations: String,
}

/// The sub-scores behind `MatchResult::match_score`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub exact_match_score: f64,
    pub semantic_score: f64,
    pub experience_score: f64,
    pub resume_years: f64,
    pub required_years: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchAnalysis {
    #[serde(flatten)]
    pub result: MatchResult,
    pub breakdown: ScoreBreakdown,
}

pub struct JobMatcher {
    skills: Arc<SkillExtractor>,
    embedder: Arc<dyn Embedder>,
    recommender: RecommendationGenerator,
    weights: ScoreWeights,
}

impl JobMatcher {
    pub fn new(
        skills: Arc<SkillExtractor>,
        embedder: Arc<dyn Embedder>,
        recommender: RecommendationGenerator,
    ) -> Self {
        Self {
            skills,
            embedder,
            recommender,
            weights: ScoreWeights::default(),
        }
    }

    /// Scores a resume against a job description. Never fails: collaborator
    /// errors degrade to neutral sub-scores and fallback advice.
    pub async fn analyze_job_match(
        &self,
        resume_text: &str,
        job_description: &str,
        resume_skills: &[String],
    ) -> MatchResult {
        self.analyze(resume_text, job_description, resume_skills)
            .await
            .result
    }

    /// Same as `analyze_job_match`, keeping the sub-scores.
    pub async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
        resume_skills: &[String],
    ) -> MatchAnalysis {
        let normalizer = self.skills.normalizer();
        let resume_set = normalizer.normalize_all(resume_skills);
        let job_set = normalizer.normalize_all(&self.skills.extract_skills(job_description));

        let overlap = match_skills(&resume_set, &job_set);

        let semantic = semantic_score(self.embedder.as_ref(), resume_text, job_description).await;

        let resume_years = extract_years(resume_text);
        let required_years = extract_years(job_description);
        let experience = experience_score(resume_years, required_years);

        let match_score = combine_scores(
            overlap.exact_match_score,
            semantic,
            experience,
            &self.weights,
        );

        info!(
            "Job match scored {match_score}: exact={:.1} semantic={:.1} experience={:.1} ({} job skills)",
            overlap.exact_match_score,
            semantic,
            experience,
            job_set.len()
        );

        let recommendations = self
            .recommender
            .generate(RecommendationInput {
                resume_text,
                job_description,
                matched_skills: &overlap.matched,
                missing_skills: &overlap.missing,
                match_score,
            })
            .await;

        MatchAnalysis {
            breakdown: ScoreBreakdown {
                exact_match_score: round1(overlap.exact_match_score),
                semantic_score: round1(semantic),
                experience_score: experience,
                resume_years,
                required_years,
            },
            result: MatchResult {
                match_score,
                matched_skills: overlap.matched,
                missing_skills: overlap.missing,
                recommendations,
            },
        }
    }
}
