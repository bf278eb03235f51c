use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::auth::{Action, MaybePrincipal, Principal};
use crate::errors::AppError;
use crate::jobs::filter::JobListQuery;
use crate::jobs::{visible_job, CreateJobRequest, JobView};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobView>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    pub job: JobView,
    pub is_bookmarked: bool,
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let filter = query.into_filter()?;
    let jobs: Vec<JobView> = state
        .store
        .list_jobs(&filter)
        .await?
        .into_iter()
        .map(JobView::from)
        .collect();
    Ok(Json(JobListResponse {
        count: jobs.len(),
        jobs,
    }))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
    Path(id): Path<i64>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let job = visible_job(state.store.as_ref(), id).await?;
    let is_bookmarked = match principal {
        Some(p) => state.store.find_bookmark(p.user_id, job.id).await?.is_some(),
        None => false,
    };
    Ok(Json(JobDetailResponse {
        job: job.into(),
        is_bookmarked,
    }))
}

/// POST /api/v1/jobs
///
/// New postings start as `pending` and stay hidden until moderated.
pub async fn handle_create_job(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobView>), AppError> {
    principal.require(Action::CreateJob)?;

    let new_job = request.validate(principal.user_id)?;
    let job = state.store.create_job(new_job).await?;
    info!(job_id = job.id, recruiter_id = principal.user_id, "Job submitted for moderation");

    Ok((StatusCode::CREATED, Json(job.into())))
}
