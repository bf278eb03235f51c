use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::auth::{Action, Principal};
use crate::errors::AppError;
use crate::jobs::filter::JobFilter;
use crate::jobs::JobView;
use crate::recommend::engine::{recommend, Recommendation};
use crate::recommend::extract::{first_available_text, TextSource};
use crate::recommend::tokenize::tokenize;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendationEntry {
    pub score: usize,
    pub matched_skills: String,
    pub job: JobView,
}

impl From<Recommendation> for RecommendationEntry {
    fn from(r: Recommendation) -> Self {
        RecommendationEntry {
            score: r.score,
            matched_skills: r.matched_skills,
            job: r.job.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub results: Vec<RecommendationEntry>,
}

/// POST /api/v1/recommendations
///
/// Multipart fields, both optional: `resume` (PDF) and `skills` (text).
/// Text from the resume wins; typed skills are the fallback.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    principal: Principal,
    multipart: Multipart,
) -> Result<Json<RecommendationsResponse>, AppError> {
    principal.require(Action::Recommend)?;

    let sources = read_sources(multipart).await?;
    let text = first_available_text(sources).await;
    let tokens = tokenize(&text);

    let jobs = state.store.list_jobs(&JobFilter::approved()).await?;
    let results = recommend(&tokens, &jobs);
    info!(
        user_id = principal.user_id,
        tokens = tokens.len(),
        results = results.len(),
        "Recommendations computed"
    );

    Ok(Json(RecommendationsResponse {
        results: results.into_iter().map(RecommendationEntry::from).collect(),
    }))
}

/// Collects sources in precedence order: document first, typed skills second.
async fn read_sources(mut multipart: Multipart) -> Result<Vec<TextSource>, AppError> {
    let mut document = None;
    let mut typed = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        match field.name() {
            Some("resume") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read resume: {e}")))?;
                if !bytes.is_empty() {
                    document = Some(TextSource::Document(bytes));
                }
            }
            Some("skills") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read skills: {e}")))?;
                typed = Some(TextSource::Typed(text));
            }
            _ => {}
        }
    }
    Ok(document.into_iter().chain(typed).collect())
}
