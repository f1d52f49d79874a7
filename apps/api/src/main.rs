mod advice;
mod config;
mod db;
mod embeddings;
mod errors;
mod llm_client;
mod matching;
mod models;
mod resumes;
mod routes;
mod skills;
mod state;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::advice::CareerAdvisor;
use crate::config::Config;
use crate::db::create_pool;
use crate::embeddings::{Embedder, HashEmbedder, HttpEmbedder};
use crate::llm_client::{ChatCompleter, LlmClient};
use crate::matching::recommendations::RecommendationGenerator;
use crate::matching::JobMatcher;
use crate::resumes::cache::ResumeCache;
use crate::routes::build_router;
use crate::skills::SkillExtractor;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing or malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Compass API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    let cache = ResumeCache::new(redis, config.resume_cache_ttl_secs);
    info!(
        "Redis resume cache initialized (ttl: {}s)",
        config.resume_cache_ttl_secs
    );

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize LLM client
    let llm_client = LlmClient::new(&config.llm)?;
    info!("LLM client initialized (model: {})", llm_client.model());
    let llm: Arc<dyn ChatCompleter> = Arc::new(llm_client);

    let embedder = build_embedder(&config)?;
    info!(
        "Embedder initialized ({}, dim {})",
        embedder.name(),
        embedder.dimension()
    );

    // Skill vocabulary (bundled assets unless paths are configured)
    let skills = Arc::new(
        SkillExtractor::load(
            config.skills_db_path.as_deref(),
            config.skill_synonyms_path.as_deref(),
        )
        .context("Failed to load skill assets")?,
    );

    let matcher = Arc::new(JobMatcher::new(
        Arc::clone(&skills),
        Arc::clone(&embedder),
        RecommendationGenerator::new(Arc::clone(&llm), config.llm.temperature),
    ));
    let advisor = Arc::new(CareerAdvisor::new(
        embedder,
        llm,
        config.llm.max_tokens,
        config.llm.temperature,
    ));

    // Build app state
    let state = AppState {
        db,
        cache,
        s3,
        config: config.clone(),
        skills,
        matcher,
        advisor,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Remote embeddings when an API key is configured, local feature hashing otherwise.
fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    if config.embedding.api_key.is_some() {
        Ok(Arc::new(HttpEmbedder::new(&config.embedding)?))
    } else {
        Ok(Arc::new(HashEmbedder::new(config.embedding.dimension)))
    }
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "compass-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
