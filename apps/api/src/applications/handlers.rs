use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::applications::workflow::{
    parse_requested_status, submit_application, update_status, ApplyOutcome, ApplySubmission,
    ResumeUpload,
};
use crate::auth::{Action, Principal};
use crate::errors::AppError;
use crate::jobs::visible_job;
use crate::models::application::{Application, ApplicationDetail, ApplicationStatus};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub outcome: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
}

#[derive(Debug, Serialize)]
pub struct StatusChoice {
    pub value: ApplicationStatus,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ManageApplicationsResponse {
    pub applications: Vec<ApplicationDetail>,
    pub status_choices: Vec<StatusChoice>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// POST /api/v1/jobs/:id/apply
///
/// Multipart fields: `resume` (file), `cover_letter` (text).
pub async fn handle_apply(
    State(state): State<AppState>,
    principal: Principal,
    Path(job_id): Path<i64>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApplyResponse>), AppError> {
    let job = visible_job(state.store.as_ref(), job_id).await?;
    principal.require(Action::ApplyToJob { job_id: job.id })?;

    let submission = read_submission(multipart).await?;
    let outcome = submit_application(
        state.store.as_ref(),
        state.resumes.as_ref(),
        job.id,
        principal.user_id,
        submission,
    )
    .await?;

    Ok(match outcome {
        ApplyOutcome::Submitted(application) => (
            StatusCode::CREATED,
            Json(ApplyResponse {
                outcome: "submitted",
                message: "Job applied successfully!",
                application: Some(application),
            }),
        ),
        ApplyOutcome::AlreadyApplied => (
            StatusCode::OK,
            Json(ApplyResponse {
                outcome: "already_applied",
                message: "You have already applied for this job.",
                application: None,
            }),
        ),
    })
}

async fn read_submission(mut multipart: Multipart) -> Result<ApplySubmission, AppError> {
    let mut submission = ApplySubmission::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        match field.name() {
            Some("resume") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read resume: {e}")))?;
                submission.resume = Some(ResumeUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            Some("cover_letter") => {
                submission.cover_letter = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read cover letter: {e}")))?;
            }
            _ => {}
        }
    }
    Ok(submission)
}

/// GET /api/v1/applications/manage
pub async fn handle_manage_applications(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<ManageApplicationsResponse>, AppError> {
    principal.require(Action::ManageApplications)?;

    let applications = state
        .store
        .list_applications_for_recruiter(principal.user_id)
        .await?;
    let status_choices = ApplicationStatus::ALL
        .into_iter()
        .map(|value| StatusChoice {
            value,
            label: value.label(),
        })
        .collect();

    Ok(Json(ManageApplicationsResponse {
        applications,
        status_choices,
    }))
}

/// POST /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    principal: Principal,
    Path(application_id): Path<i64>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<Application>, AppError> {
    principal.require(Action::ManageApplications)?;

    let status = parse_requested_status(
        state.store.as_ref(),
        principal.user_id,
        application_id,
        &request.status,
    )
    .await?;
    let application =
        update_status(state.store.as_ref(), principal.user_id, application_id, status).await?;
    Ok(Json(application))
}
