//! Staff moderation: bulk status changes and deletion. This is the only way a
//! job becomes publicly visible.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{Action, Principal};
use crate::errors::AppError;
use crate::jobs::filter::JobFilter;
use crate::jobs::JobView;
use crate::models::job::JobStatus;
use crate::state::AppState;
use crate::store::JobBoardStore;

#[derive(Debug, Default, Deserialize)]
pub struct ModerationQueueQuery {
    pub status: Option<JobStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ModerateJobsRequest {
    pub job_ids: Vec<i64>,
    pub status: JobStatus,
}

#[derive(Debug, Serialize)]
pub struct ModerateJobsResponse {
    pub updated: u64,
    pub status: JobStatus,
}

/// Applies a moderation decision to every listed job.
/// Only `pending`, `approved` and `rejected` are moderation outcomes.
pub async fn moderate_jobs(
    store: &dyn JobBoardStore,
    job_ids: &[i64],
    status: JobStatus,
) -> Result<u64, AppError> {
    if status == JobStatus::Draft {
        return Err(AppError::Validation(
            "Moderation can set pending, approved or rejected".to_string(),
        ));
    }
    if job_ids.is_empty() {
        return Ok(0);
    }
    store.set_job_status(job_ids, status).await
}

/// GET /api/v1/moderation/jobs
pub async fn handle_moderation_queue(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ModerationQueueQuery>,
) -> Result<Json<Vec<JobView>>, AppError> {
    principal.require(Action::ModerateJobs)?;

    let jobs = state
        .store
        .list_jobs(&JobFilter::with_status(query.status))
        .await?;
    Ok(Json(jobs.into_iter().map(JobView::from).collect()))
}

/// POST /api/v1/moderation/jobs
pub async fn handle_moderate_jobs(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<ModerateJobsRequest>,
) -> Result<Json<ModerateJobsResponse>, AppError> {
    principal.require(Action::ModerateJobs)?;

    let updated = moderate_jobs(state.store.as_ref(), &request.job_ids, request.status).await?;
    info!(
        moderator_id = principal.user_id,
        status = %request.status,
        updated,
        "Moderation applied"
    );
    Ok(Json(ModerateJobsResponse {
        updated,
        status: request.status,
    }))
}

/// DELETE /api/v1/moderation/jobs/:id
///
/// Applications and bookmarks on the job go with it.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    principal.require(Action::ModerateJobs)?;

    if !state.store.delete_job(id).await? {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    info!(job_id = id, moderator_id = principal.user_id, "Job deleted");
    Ok(StatusCode::NO_CONTENT)
}
