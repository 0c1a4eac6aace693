//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::fulltext::extract_upload_text;
use crate::analysis::models::{
    AnalysisResult, Journal, Preferences, ResponseLanguage, SubjectArea, Submission, AUTO_DETECT,
    SUBJECT_AREAS,
};
use crate::analysis::ranking::{rank_for_display, RankedJournal, SortKey};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(flatten)]
    pub submission: Submission,
    /// Client-chosen tag used to discard responses for superseded submissions.
    #[serde(default)]
    pub request_id: Option<Uuid>,
    #[serde(default)]
    pub sort_by: SortKey,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub request_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub model: String,
    pub sort_by: SortKey,
    pub result: AnalysisResult,
    pub journals: Vec<RankedJournal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    pub journals: Vec<Journal>,
    #[serde(default)]
    pub sort_by: SortKey,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    pub sort_by: SortKey,
    pub journals: Vec<RankedJournal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAreasResponse {
    pub auto_detect: &'static str,
    pub areas: &'static [&'static str],
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Runs one analysis for a JSON submission and returns the result with a ranked journal view.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let response = run_analysis(
        &state,
        request.submission,
        request.request_id,
        request.sort_by,
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/v1/analyze/upload
///
/// Same as `/analyze`, from a multipart form. An optional `file` part (text or PDF)
/// supplies the manuscript full text.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = read_upload_form(multipart).await?;
    let response = run_analysis(&state, form.submission, form.request_id, form.sort_by).await?;
    Ok(Json(response))
}

/// POST /api/v1/journals/rank
///
/// Re-sorts an already returned journal list when the user changes the sort option.
pub async fn handle_rank(Json(request): Json<RankRequest>) -> Json<RankResponse> {
    Json(RankResponse {
        sort_by: request.sort_by,
        journals: rank_for_display(&request.journals, request.sort_by),
    })
}

/// GET /api/v1/subject-areas
pub async fn handle_subject_areas() -> Json<SubjectAreasResponse> {
    Json(SubjectAreasResponse {
        auto_detect: AUTO_DETECT,
        areas: SUBJECT_AREAS,
    })
}

async fn run_analysis(
    state: &AppState,
    submission: Submission,
    request_id: Option<Uuid>,
    sort_by: SortKey,
) -> Result<AnalyzeResponse, AppError> {
    submission.validate()?;

    let request_id = request_id.unwrap_or_else(Uuid::new_v4);
    info!(
        %request_id,
        subject_area = ?submission.subject_area,
        has_full_text = submission.full_text_excerpt().is_some(),
        "Analysis requested"
    );

    let language = submission.language;
    let result = state
        .analyzer
        .analyze(&submission)
        .await
        .map_err(|source| AppError::Analysis { source, language })?;

    let journals = rank_for_display(&result.journals, sort_by);

    Ok(AnalyzeResponse {
        request_id,
        analyzed_at: Utc::now(),
        model: state.analyzer.model().to_string(),
        sort_by,
        result,
        journals,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart form
// ────────────────────────────────────────────────────────────────────────────

struct UploadForm {
    submission: Submission,
    request_id: Option<Uuid>,
    sort_by: SortKey,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut title = String::new();
    let mut keywords = String::new();
    let mut abstract_text = String::new();
    let mut subject_area = SubjectArea::AutoDetect;
    let mut full_text: Option<String> = None;
    let mut file_text: Option<String> = None;
    let mut preferences = Preferences::default();
    let mut language = ResponseLanguage::default();
    let mut request_id = None;
    let mut sort_by = SortKey::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let file_name = field.file_name().unwrap_or("manuscript.txt").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read file: {e}")))?;
            // Browsers send an empty part when no file was chosen.
            if !bytes.is_empty() {
                let text = extract_upload_text(file_name, bytes).await?;
                // A PDF without a text layer must not blank out a pasted fullText.
                if !text.trim().is_empty() {
                    file_text = Some(text);
                }
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read field '{name}': {e}")))?;

        match name.as_str() {
            "title" => title = value,
            "keywords" => keywords = value,
            "abstract" => abstract_text = value,
            "subjectArea" => subject_area = SubjectArea::from(value),
            "fullText" => full_text = Some(value),
            "openAccess" => preferences.open_access = parse_flag(&value),
            "highImpact" => preferences.high_impact = parse_flag(&value),
            "fastReview" => preferences.fast_review = parse_flag(&value),
            "language" => language = parse_enum_field(&name, &value)?,
            "sortBy" => sort_by = parse_enum_field(&name, &value)?,
            "requestId" => {
                request_id = Some(Uuid::parse_str(value.trim()).map_err(|_| {
                    AppError::Validation("requestId must be a UUID".to_string())
                })?)
            }
            _ => {}
        }
    }

    Ok(UploadForm {
        submission: Submission {
            title,
            keywords,
            abstract_text,
            subject_area,
            full_text: file_text.or(full_text),
            preferences,
            language,
        },
        request_id,
        sort_by,
    })
}

/// HTML checkboxes post "on"; API clients tend to post "true" or "1".
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}

fn parse_enum_field<T: serde::de::DeserializeOwned>(name: &str, value: &str) -> Result<T, AppError> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_string()))
        .map_err(|_| AppError::Validation(format!("Unsupported value for '{name}': {value}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
