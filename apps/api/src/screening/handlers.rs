use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::AnalyzeResponse;
use crate::screening::pipeline::{ResumeUpload, Screener};
use crate::state::AppState;

const JOB_DESCRIPTION_FIELD: &str = "job_description";
const RESUMES_FIELD: &str = "resumes";

/// Fields of an `/analyze` form once fully read.
struct AnalyzeForm {
    job_description: Option<String>,
    uploads: Vec<ResumeUpload>,
}

/// POST /analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let batch_id = Uuid::new_v4();

    async move {
        let form = read_form(multipart).await?;

        let job_description = form
            .job_description
            .filter(|jd| !jd.is_empty())
            .ok_or_else(|| AppError::Validation("Job description is required".to_string()))?;

        info!(uploads = form.uploads.len(), "Screening batch");

        let screener = Screener::from_state(&state);
        let uploads = form.uploads;
        let results = tokio::task::spawn_blocking(move || {
            screener.screen_batch(&job_description, uploads)
        })
        .await
        .context("Resume screening worker failed")??;

        Ok::<_, AppError>(Json(AnalyzeResponse {
            success: true,
            results,
        }))
    }
    .instrument(info_span!("analyze", %batch_id))
    .await
}

/// Drains the multipart stream. The first `job_description` wins; `resumes`
/// parts without a filename are not file uploads and are ignored.
async fn read_form(mut multipart: Multipart) -> Result<AnalyzeForm, AppError> {
    let mut form = AnalyzeForm {
        job_description: None,
        uploads: Vec::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart field: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(JOB_DESCRIPTION_FIELD) if form.job_description.is_none() => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job description: {e}"))
                })?;
                form.job_description = Some(text);
            }
            Some(RESUMES_FIELD) => {
                let Some(filename) = field.file_name().map(str::to_owned) else {
                    continue;
                };
                let content = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read upload '{filename}': {e}"))
                })?;
                form.uploads.push(ResumeUpload { filename, content });
            }
            _ => {}
        }
    }

    Ok(form)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
