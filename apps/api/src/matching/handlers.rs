use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::MatchAnalysis;
use crate::resumes::load_resume_analysis;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobMatchRequest {
    pub user_id: Uuid,
    pub resume_id: Uuid,
    pub job_description: String,
}

/// POST /api/v1/job-match
pub async fn handle_job_match(
    State(state): State<AppState>,
    Json(req): Json<JobMatchRequest>,
) -> Result<Json<MatchAnalysis>, AppError> {
    if req.job_description.trim().is_empty() {
        return Err(AppError::Validation("job_description must not be empty".into()));
    }

    let resume = load_resume_analysis(&state, req.resume_id, req.user_id).await?;
    let analysis = state
        .matcher
        .analyze(&resume.text, &req.job_description, &resume.skills)
        .await;

    Ok(Json(analysis))
}
