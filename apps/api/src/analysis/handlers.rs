//! Axum route handlers for the Analysis API.

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::pipeline::AnalysisInput;
use crate::errors::AppError;
use crate::extraction::StagedDocument;
use crate::models::analysis::AnalysisRecord;
use crate::state::AppState;

/// Multipart field carrying the resume file.
const RESUME_FIELD: &str = "resume";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// JSON body for text-only submissions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnalysisRequest {
    pub jd_text: Option<String>,
    pub resume_text: Option<String>,
    pub github_url: Option<String>,
}

impl From<CreateAnalysisRequest> for AnalysisInput {
    fn from(req: CreateAnalysisRequest) -> Self {
        AnalysisInput {
            jd_text: req.jd_text,
            resume_text: req.resume_text,
            resume_file: None,
            github_url: req.github_url,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analysis
///
/// Accepts `multipart/form-data` (optional `resume` file plus text fields) or
/// a JSON body with the same text fields. Runs the full analysis pipeline and
/// returns the stored record.
pub async fn handle_create_analysis(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<AnalysisRecord>, AppError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let input = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?;
        read_multipart(multipart).await?
    } else {
        let Json(body) = Json::<CreateAnalysisRequest>::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))?;
        body.into()
    };

    info!(
        "POST /api/analysis: has_file={}, has_github={}",
        input.resume_file.is_some(),
        input.github_url.as_deref().is_some_and(|u| !u.trim().is_empty())
    );

    let record = state.pipeline.run(input).await?;
    Ok(Json(record))
}

/// GET /api/analysis
///
/// The 20 most recent analyses, newest first.
pub async fn handle_list_analyses(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnalysisRecord>>, AppError> {
    let records = state.history.recent(state.store.as_ref()).await?;
    Ok(Json(records))
}

/// GET /api/analysis/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisRecord>, AppError> {
    let record = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;
    Ok(Json(record))
}

/// Streams the `resume` part into a staged temp file and collects text fields.
async fn read_multipart(mut multipart: Multipart) -> Result<AnalysisInput, AppError> {
    let mut input = AnalysisInput::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart field: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if field.file_name().is_some() {
            if name != RESUME_FIELD {
                return Err(AppError::Validation(format!(
                    "Unexpected file field '{name}'; upload the resume as '{RESUME_FIELD}'"
                )));
            }
            let media_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let mut document = StagedDocument::create(media_type)
                .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| AppError::Validation(format!("Upload interrupted: {e}")))?
            {
                document
                    .write_chunk(&chunk)
                    .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;
            }
            debug!("Staged resume upload at {}", document.path().display());
            input.resume_file = Some(document);
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid text field '{name}': {e}")))?;
        match name.as_str() {
            "jdText" => input.jd_text = Some(value),
            "resumeText" => input.resume_text = Some(value),
            "githubUrl" => input.github_url = Some(value),
            _ => debug!("Ignoring unknown form field '{name}'"),
        }
    }

    Ok(input)
}
