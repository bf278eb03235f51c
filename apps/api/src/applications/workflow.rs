//! Application submission. One application per seeker per job; a repeat is an
//! informational outcome, not an error.

use bytes::Bytes;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus, NewApplication};
use crate::storage::{resume_key, ResumeStorage};
use crate::store::JobBoardStore;

pub const MISSING_FIELDS_MESSAGE: &str = "Resume and cover letter are required.";

#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct ApplySubmission {
    pub resume: Option<ResumeUpload>,
    pub cover_letter: String,
}

#[derive(Debug)]
pub enum ApplyOutcome {
    Submitted(Application),
    AlreadyApplied,
}

/// Submits an application for an already-visible job.
///
/// The duplicate check runs before validation, so re-submitting an empty
/// form after applying still reports "already applied".
pub async fn submit_application(
    store: &dyn JobBoardStore,
    resumes: &dyn ResumeStorage,
    job_id: i64,
    applicant_id: i64,
    submission: ApplySubmission,
) -> Result<ApplyOutcome, AppError> {
    if store.find_application(job_id, applicant_id).await?.is_some() {
        return Ok(ApplyOutcome::AlreadyApplied);
    }

    let cover_letter = submission.cover_letter.trim();
    let resume = match submission.resume {
        Some(resume) if !resume.bytes.is_empty() && !cover_letter.is_empty() => resume,
        _ => return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string())),
    };

    let key = resume_key(job_id, applicant_id, resume.file_name.as_deref());
    let content_type = resume
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");
    resumes.put(&key, resume.bytes, content_type).await?;

    let created = store
        .create_application(NewApplication {
            job_id,
            applicant_id,
            resume_key: key.clone(),
            cover_letter: submission.cover_letter,
        })
        .await;

    match created {
        Ok(application) => {
            info!(
                application_id = application.id,
                job_id, applicant_id, "Application submitted"
            );
            Ok(ApplyOutcome::Submitted(application))
        }
        // Lost a race with a concurrent identical submission.
        Err(AppError::Conflict(_)) => {
            if let Err(e) = resumes.delete(&key).await {
                warn!(key = %key, "Could not remove orphaned resume: {e}");
            }
            Ok(ApplyOutcome::AlreadyApplied)
        }
        Err(e) => Err(e),
    }
}

/// Parses a requested status for `application_id`. An application outside the
/// recruiter's jobs is reported as not found before the value is judged.
pub async fn parse_requested_status(
    store: &dyn JobBoardStore,
    recruiter_id: i64,
    application_id: i64,
    requested: &str,
) -> Result<ApplicationStatus, AppError> {
    match requested.parse::<ApplicationStatus>() {
        Ok(status) => Ok(status),
        Err(invalid) => {
            let owned = store
                .list_applications_for_recruiter(recruiter_id)
                .await?
                .iter()
                .any(|detail| detail.application.id == application_id);
            Err(if owned {
                invalid
            } else {
                application_not_found(application_id)
            })
        }
    }
}

fn application_not_found(application_id: i64) -> AppError {
    AppError::NotFound(format!("Application {application_id} not found"))
}

/// Sets an application's status on behalf of the recruiter who owns the job.
/// Any status may follow any other.
pub async fn update_status(
    store: &dyn JobBoardStore,
    recruiter_id: i64,
    application_id: i64,
    status: ApplicationStatus,
) -> Result<Application, AppError> {
    let application = store
        .set_application_status(application_id, recruiter_id, status)
        .await?
        .ok_or_else(|| application_not_found(application_id))?;
    info!(application_id, recruiter_id, status = %status, "Application status updated");
    Ok(application)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{JobStatus, NewJob};
    use crate::models::skills::Skills;
    use crate::models::user::{NewUser, Role};
    use crate::storage::memory::MemoryResumeStorage;
    use crate::store::memory::MemoryStore;

    struct Fixture {
        store: MemoryStore,
        resumes: MemoryResumeStorage,
        recruiter_id: i64,
        seeker_id: i64,
        job_id: i64,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let recruiter = store
            .create_user(NewUser {
                username: "rita".into(),
                email: "rita@example.com".into(),
                role: Role::Recruiter,
            })
            .await
            .unwrap();
        let seeker = store
            .create_user(NewUser {
                username: "sam".into(),
                email: "sam@example.com".into(),
                role: Role::Jobseeker,
            })
            .await
            .unwrap();
        let job = store
            .create_job(NewJob {
                title: "Engineer".into(),
                description: "Build things".into(),
                location: "Remote".into(),
                min_salary: None,
                max_salary: None,
                skills: Skills::from_csv("rust"),
                company_name: "Acme".into(),
                posted_by: recruiter.id,
            })
            .await
            .unwrap();
        store.set_job_status(&[job.id], JobStatus::Approved).await.unwrap();
        Fixture {
            store,
            resumes: MemoryResumeStorage::default(),
            recruiter_id: recruiter.id,
            seeker_id: seeker.id,
            job_id: job.id,
        }
    }

    fn full_submission() -> ApplySubmission {
        ApplySubmission {
            resume: Some(ResumeUpload {
                file_name: Some("cv.pdf".into()),
                content_type: Some("application/pdf".into()),
                bytes: Bytes::from_static(b"%PDF-1.4"),
            }),
            cover_letter: "Hire me".into(),
        }
    }

    #[tokio::test]
    async fn test_apply_twice_keeps_one_row() {
        let f = fixture().await;
        let first = submit_application(&f.store, &f.resumes, f.job_id, f.seeker_id, full_submission())
            .await
            .unwrap();
        assert!(matches!(first, ApplyOutcome::Submitted(_)));

        let second = submit_application(&f.store, &f.resumes, f.job_id, f.seeker_id, full_submission())
            .await
            .unwrap();
        assert!(matches!(second, ApplyOutcome::AlreadyApplied));
        assert_eq!(f.store.application_count().await, 1);
        assert_eq!(f.resumes.keys().await.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_resume_or_cover_letter_rejected() {
        let f = fixture().await;
        let no_resume = ApplySubmission {
            resume: None,
            ..full_submission()
        };
        let blank_letter = ApplySubmission {
            cover_letter: "  \n ".into(),
            ..full_submission()
        };
        for submission in [no_resume, blank_letter] {
            let result =
                submit_application(&f.store, &f.resumes, f.job_id, f.seeker_id, submission).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
        assert_eq!(f.store.application_count().await, 0);
        assert!(f.resumes.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_already_applied_wins_over_validation() {
        let f = fixture().await;
        submit_application(&f.store, &f.resumes, f.job_id, f.seeker_id, full_submission())
            .await
            .unwrap();
        let outcome = submit_application(
            &f.store,
            &f.resumes,
            f.job_id,
            f.seeker_id,
            ApplySubmission::default(),
        )
        .await
        .unwrap();
        assert!(matches!(outcome, ApplyOutcome::AlreadyApplied));
    }

    #[tokio::test]
    async fn test_lost_race_is_already_applied_and_cleans_upload() {
        let f = fixture().await;
        submit_application(&f.store, &f.resumes, f.job_id, f.seeker_id, full_submission())
            .await
            .unwrap();

        f.store.simulate_concurrent_insert();
        let outcome = submit_application(&f.store, &f.resumes, f.job_id, f.seeker_id, full_submission())
            .await
            .unwrap();
        assert!(matches!(outcome, ApplyOutcome::AlreadyApplied));
        assert_eq!(f.store.application_count().await, 1);
        assert_eq!(f.resumes.keys().await.len(), 1);
    }

    #[tokio::test]
    async fn test_status_update_only_by_owner() {
        let f = fixture().await;
        let ApplyOutcome::Submitted(application) =
            submit_application(&f.store, &f.resumes, f.job_id, f.seeker_id, full_submission())
                .await
                .unwrap()
        else {
            panic!("expected a new application");
        };

        let updated = update_status(&f.store, f.recruiter_id, application.id, ApplicationStatus::Offer)
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Offer);

        // Backward transitions are accepted.
        let updated = update_status(&f.store, f.recruiter_id, application.id, ApplicationStatus::Applied)
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Applied);

        let other = update_status(&f.store, f.seeker_id, application.id, ApplicationStatus::Rejected).await;
        assert!(matches!(other, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_requested_status_checks_ownership_first() {
        let f = fixture().await;
        let ApplyOutcome::Submitted(application) =
            submit_application(&f.store, &f.resumes, f.job_id, f.seeker_id, full_submission())
                .await
                .unwrap()
        else {
            panic!("expected a new application");
        };

        let parsed = parse_requested_status(&f.store, f.recruiter_id, application.id, "offer").await;
        assert_eq!(parsed.unwrap(), ApplicationStatus::Offer);

        let bad_value = parse_requested_status(&f.store, f.recruiter_id, application.id, "hired").await;
        assert!(matches!(bad_value, Err(AppError::Validation(_))));

        let not_owner = parse_requested_status(&f.store, f.seeker_id, application.id, "hired").await;
        assert!(matches!(not_owner, Err(AppError::NotFound(_))));

        let missing = parse_requested_status(&f.store, f.recruiter_id, 9999, "hired").await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
