//! Capability checks, independent of storage. Handlers ask `authorize` before
//! touching the store; a denial becomes a redirect to a neutral page.

use crate::auth::Principal;
use crate::models::user::Role;

pub const JOB_LIST_PATH: &str = "/api/v1/jobs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateJob,
    ApplyToJob { job_id: i64 },
    ManageApplications,
    ToggleBookmark,
    ViewBookmarks,
    Recommend,
    ModerateJobs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { redirect_to: String },
}

pub fn authorize(principal: &Principal, action: Action) -> Decision {
    let allowed = match action {
        Action::CreateJob | Action::ManageApplications => principal.role == Role::Recruiter,
        Action::ApplyToJob { .. } => principal.role == Role::Jobseeker,
        Action::ModerateJobs => principal.is_staff,
        Action::ToggleBookmark | Action::ViewBookmarks | Action::Recommend => true,
    };

    if allowed {
        return Decision::Allow;
    }

    let redirect_to = match action {
        Action::ApplyToJob { job_id } => format!("{JOB_LIST_PATH}/{job_id}"),
        _ => JOB_LIST_PATH.to_string(),
    };
    Decision::Deny { redirect_to }
}
