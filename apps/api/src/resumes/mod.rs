//! Resume upload, storage and the read path shared by matching and advice.

use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeAnalysis;
use crate::state::AppState;

pub mod cache;
pub mod files;
pub mod handlers;
pub mod parser;
pub mod store;

/// Loads a resume owned by `user_id`.
///
/// Ownership is always checked against PostgreSQL; only the derived analysis
/// comes from the cache. A foreign or unknown id is reported as not found.
pub async fn load_resume_analysis(
    state: &AppState,
    resume_id: Uuid,
    user_id: Uuid,
) -> Result<ResumeAnalysis, AppError> {
    if !store::resume_owned_by(&state.db, resume_id, user_id).await? {
        return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
    }

    if let Some(analysis) = state.cache.get(resume_id).await {
        return Ok(analysis);
    }

    debug!("Resume cache miss for {resume_id}");
    let row = store::get_owned_resume(&state.db, resume_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    let analysis = ResumeAnalysis::from(row);
    state.cache.put(resume_id, &analysis).await;
    Ok(analysis)
}
