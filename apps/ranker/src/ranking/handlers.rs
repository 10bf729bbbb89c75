//! Axum route handlers for the Ranking API.
//!
//! Handlers only translate HTTP into `pipeline::run` calls; all scoring
//! decisions live in the pipeline and its stages.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::models::outcome::RankingOutcome;
use crate::models::resume::ResumeInput;
use crate::ranking::pipeline;
use crate::ranking::settings::ScoringConfig;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TextResume {
    pub identifier: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct RankTextRequest {
    pub job_description: String,
    pub resumes: Vec<TextResume>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/rankings
///
/// Multipart upload: one `job_description` text field and one or more `resumes`
/// file fields. Each file's name is its identifier in the result. Uploads stay
/// in memory and are dropped when the request ends.
pub async fn handle_rank_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RankingOutcome>, AppError> {
    let mut job_description: Option<String> = None;
    let mut resumes = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => {
                job_description = Some(field.text().await.map_err(multipart_error)?);
            }
            "resumes" | "resume" => {
                let identifier = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("resume-{}", resumes.len() + 1));
                let bytes = field.bytes().await.map_err(multipart_error)?;
                resumes.push(ResumeInput::document(identifier, bytes));
            }
            other => debug!("Ignoring unknown multipart field '{other}'"),
        }
    }

    let job_description = job_description
        .ok_or_else(|| AppError::Validation("job_description field is required".to_string()))?;

    rank(&state, resumes, &job_description).await
}

/// POST /api/v1/rankings/text
///
/// Same ranking for callers that already hold the resume text.
pub async fn handle_rank_text(
    State(state): State<AppState>,
    Json(request): Json<RankTextRequest>,
) -> Result<Json<RankingOutcome>, AppError> {
    let resumes = request
        .resumes
        .into_iter()
        .map(|r| ResumeInput::text(r.identifier, r.text))
        .collect();

    rank(&state, resumes, &request.job_description).await
}

/// GET /api/v1/scoring-config
///
/// The scoring constants every run uses: vocabulary, match mode, bonus, bands.
pub async fn handle_scoring_config(State(state): State<AppState>) -> Json<ScoringConfig> {
    Json(state.scoring.as_ref().clone())
}

async fn rank(
    state: &AppState,
    resumes: Vec<ResumeInput>,
    job_description: &str,
) -> Result<Json<RankingOutcome>, AppError> {
    let outcome = pipeline::run(
        resumes,
        job_description,
        state.embedder.clone(),
        state.scoring.clone(),
        state.config.resume_timeout,
    )
    .await?;

    Ok(Json(outcome))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("malformed multipart body: {}", e.body_text()))
    }
}
