use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::advice::CareerAdvice;
use crate::errors::AppError;
use crate::resumes::load_resume_analysis;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CareerAdviceRequest {
    pub user_id: Uuid,
    pub resume_id: Uuid,
    pub query: String,
}

/// POST /api/v1/career-advice
pub async fn handle_career_advice(
    State(state): State<AppState>,
    Json(req): Json<CareerAdviceRequest>,
) -> Result<Json<CareerAdvice>, AppError> {
    let query = req.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query must not be empty".into()));
    }

    let resume = load_resume_analysis(&state, req.resume_id, req.user_id).await?;
    let advice = state
        .advisor
        .advise(query, &resume.text)
        .await
        .map_err(|e| AppError::Llm(format!("Career advice LLM call failed: {e}")))?;

    Ok(Json(advice))
}
