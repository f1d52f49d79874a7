//! PostgreSQL persistence for uploaded resumes.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::ResumeRow;

pub struct NewResume<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub filename: &'a str,
    pub content_type: &'a str,
    pub s3_key: &'a str,
    pub extracted_text: &'a str,
    pub skills: &'a [String],
    pub domains: &'a [String],
}

pub async fn insert_resume(pool: &PgPool, resume: NewResume<'_>) -> Result<ResumeRow, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (id, user_id, filename, content_type, s3_key, extracted_text, skills, domains)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(resume.id)
    .bind(resume.user_id)
    .bind(resume.filename)
    .bind(resume.content_type)
    .bind(resume.s3_key)
    .bind(resume.extracted_text)
    .bind(resume.skills)
    .bind(resume.domains)
    .fetch_one(pool)
    .await
}

/// Fetches a resume only if it belongs to `user_id`.
pub async fn get_owned_resume(
    pool: &PgPool,
    resume_id: Uuid,
    user_id: Uuid,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(resume_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Cheap ownership probe that skips the text column.
pub async fn resume_owned_by(pool: &PgPool, resume_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM resumes WHERE id = $1 AND user_id = $2)",
    )
    .bind(resume_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Newest first.
pub async fn list_resumes(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY uploaded_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Returns true if a row was removed.
pub async fn delete_resume(pool: &PgPool, resume_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(resume_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
