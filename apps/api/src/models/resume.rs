use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One uploaded resume. PostgreSQL is the source of truth for everything
/// derived from the file.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub filename: String,
    pub content_type: String,
    #[serde(skip_serializing)]
    pub s3_key: String,
    #[serde(skip_serializing)]
    pub extracted_text: String,
    pub skills: Vec<String>,
    pub domains: Vec<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Listing view of a resume.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeSummary {
    pub resume_id: Uuid,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub skills_count: usize,
}

impl From<&ResumeRow> for ResumeSummary {
    fn from(row: &ResumeRow) -> Self {
        Self {
            resume_id: row.id,
            filename: row.filename.clone(),
            uploaded_at: row.uploaded_at,
            skills_count: row.skills.len(),
        }
    }
}

/// The parts of a resume the scoring and advice services read. This is the
/// value held in the resume cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub text: String,
    pub skills: Vec<String>,
    pub domains: Vec<String>,
}

impl From<ResumeRow> for ResumeAnalysis {
    fn from(row: ResumeRow) -> Self {
        Self {
            text: row.extracted_text,
            skills: row.skills,
            domains: row.domains,
        }
    }
}
