use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::advice::CareerAdvisor;
use crate::config::Config;
use crate::matching::JobMatcher;
use crate::resumes::cache::ResumeCache;
use crate::skills::SkillExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Read-through cache of resume text and skills; PostgreSQL stays authoritative.
    pub cache: ResumeCache,
    pub s3: S3Client,
    pub config: Config,
    pub skills: Arc<SkillExtractor>,
    pub matcher: Arc<JobMatcher>,
    pub advisor: Arc<CareerAdvisor>,
}
