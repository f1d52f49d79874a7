use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeAnalysis, ResumeRow, ResumeSummary};
use crate::resumes::files::{delete_file, download_file, object_key, upload_file};
use crate::resumes::parser::{extract_contact_info, extract_text, ContactInfo, ResumeFormat};
use crate::resumes::store::{self, NewResume};
use crate::state::AppState;

/// Characters of extracted text echoed back after an upload.
const PREVIEW_CHARS: usize = 500;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub resume_id: Uuid,
    pub filename: String,
    pub extracted_text: String,
    pub skills: Vec<String>,
    pub domains: Vec<String>,
    pub contact: ContactInfo,
}

#[derive(Serialize)]
pub struct ResumeListResponse {
    pub user_id: Uuid,
    pub count: usize,
    pub resumes: Vec<ResumeSummary>,
}

struct UploadedFile {
    filename: String,
    bytes: Bytes,
}

/// POST /api/v1/resumes?user_id=
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let file = read_file_field(multipart).await?;
    if file.bytes.len() > state.config.max_upload_bytes {
        return Err(AppError::Validation(format!(
            "File exceeds the {} byte upload limit",
            state.config.max_upload_bytes
        )));
    }

    let format = ResumeFormat::from_filename(&file.filename)?;
    let text = parse_upload(format, file.bytes.clone()).await?;

    let skills = state.skills.extract_skills(&text);
    let domains = state.skills.identify_domains(&skills);
    let contact = extract_contact_info(&text);

    let resume_id = Uuid::new_v4();
    let s3_key = object_key(params.user_id, resume_id, format);
    upload_file(
        &state.s3,
        &state.config.s3_bucket,
        &s3_key,
        format.content_type(),
        file.bytes,
    )
    .await?;

    let inserted = store::insert_resume(
        &state.db,
        NewResume {
            id: resume_id,
            user_id: params.user_id,
            filename: &file.filename,
            content_type: format.content_type(),
            s3_key: &s3_key,
            extracted_text: &text,
            skills: &skills,
            domains: &domains,
        },
    )
    .await;

    let row = match inserted {
        Ok(row) => row,
        Err(e) => {
            // keep S3 free of files no row points at
            if let Err(cleanup) = delete_file(&state.s3, &state.config.s3_bucket, &s3_key).await {
                warn!("Orphaned upload {s3_key}: {cleanup}");
            }
            return Err(e.into());
        }
    };

    info!(
        "Stored resume {} for user {} ({} skills, {} chars)",
        resume_id,
        params.user_id,
        row.skills.len(),
        text.len()
    );

    let response = ResumeUploadResponse {
        resume_id,
        filename: row.filename.clone(),
        extracted_text: preview(&text),
        skills: row.skills.clone(),
        domains: row.domains.clone(),
        contact,
    };
    state.cache.put(resume_id, &ResumeAnalysis::from(row)).await;

    Ok(Json(response))
}

/// GET /api/v1/resumes?user_id=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let rows = store::list_resumes(&state.db, params.user_id).await?;
    let resumes: Vec<ResumeSummary> = rows.iter().map(ResumeSummary::from).collect();
    Ok(Json(ResumeListResponse {
        user_id: params.user_id,
        count: resumes.len(),
        resumes,
    }))
}

/// GET /api/v1/resumes/:id?user_id=
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeRow>, AppError> {
    let row = owned_row(&state, id, params.user_id).await?;
    Ok(Json(row))
}

/// GET /api/v1/resumes/:id/file?user_id=
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<impl IntoResponse, AppError> {
    let row = owned_row(&state, id, params.user_id).await?;
    let bytes = download_file(&state.s3, &state.config.s3_bucket, &row.s3_key).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        row.filename.replace(['"', '\\'], "_")
    );
    Ok((
        [
            (header::CONTENT_TYPE, row.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// DELETE /api/v1/resumes/:id?user_id=
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    let row = owned_row(&state, id, params.user_id).await?;

    if !store::delete_resume(&state.db, id, params.user_id).await? {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    state.cache.invalidate(id).await;

    // The row is gone, so a failed object delete only leaks storage.
    if let Err(e) = delete_file(&state.s3, &state.config.s3_bucket, &row.s3_key).await {
        warn!("Resume {id} deleted but its file was not: {e}");
    }

    info!("Deleted resume {id} for user {}", params.user_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn owned_row(state: &AppState, id: Uuid, user_id: Uuid) -> Result<ResumeRow, AppError> {
    store::get_owned_resume(&state.db, id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

async fn read_file_field(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".into()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read uploaded file: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".into()));
        }
        return Ok(UploadedFile { filename, bytes });
    }
    Err(AppError::Validation("Missing multipart field 'file'".into()))
}

/// Text extraction is CPU-bound, so it runs on the blocking pool.
async fn parse_upload(format: ResumeFormat, bytes: Bytes) -> Result<String, AppError> {
    let text = run_blocking("resume parsing", move || extract_text(format, &bytes)).await??;
    Ok(text)
}

async fn run_blocking<T, F>(label: &'static str, job: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in {label}: {e}")))
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_untouched() {
        assert_eq!(preview("Rust engineer"), "Rust engineer");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "é".repeat(PREVIEW_CHARS + 10);
        let p = preview(&text);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
    }

    #[tokio::test]
    async fn test_parse_upload_runs_extraction() {
        let text = parse_upload(ResumeFormat::PlainText, Bytes::from_static(b"Jane Doe\n\nRust engineer"))
            .await
            .unwrap();
        assert_eq!(text, "Jane Doe Rust engineer");
    }

    #[tokio::test]
    async fn test_parse_upload_maps_parse_errors() {
        let err = parse_upload(ResumeFormat::Pdf, Bytes::from_static(b"not a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[tokio::test]
    async fn test_panicking_blocking_job_is_internal_error() {
        let err = run_blocking("test job", || -> usize { panic!("extractor blew up") })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_upload_response_shape() {
        let response = ResumeUploadResponse {
            resume_id: Uuid::nil(),
            filename: "cv.pdf".into(),
            extracted_text: "Jane".into(),
            skills: vec!["rust".into()],
            domains: vec!["Software Engineering".into()],
            contact: ContactInfo::default(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["skills"][0], "rust");
        assert!(json["contact"]["email"].is_null());
    }
}
