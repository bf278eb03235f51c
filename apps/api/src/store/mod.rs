//! Storage layer. Handlers and workflows talk to `JobBoardStore`; the
//! PostgreSQL implementation enforces uniqueness and cascades in the schema.
//!
//! Insert methods return `AppError::Conflict` on a uniqueness violation so
//! callers can tell a lost race from a real failure.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::jobs::filter::JobFilter;
use crate::models::application::{
    Application, ApplicationDetail, ApplicationStatus, NewApplication,
};
use crate::models::bookmark::{Bookmark, BookmarkedJob};
use crate::models::job::{Job, JobStatus, NewJob};
use crate::models::user::{NewUser, User};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait JobBoardStore: Send + Sync {
    // Users
    async fn create_user(&self, new: NewUser) -> Result<User, AppError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError>;

    // Jobs
    async fn create_job(&self, new: NewJob) -> Result<Job, AppError>;
    async fn get_job(&self, id: i64) -> Result<Option<Job>, AppError>;
    /// Jobs matching `filter`, ascending by id.
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, AppError>;
    /// Sets the status of every listed job; returns how many rows changed.
    async fn set_job_status(&self, ids: &[i64], status: JobStatus) -> Result<u64, AppError>;
    /// Deletes a job together with its applications and bookmarks.
    async fn delete_job(&self, id: i64) -> Result<bool, AppError>;

    // Applications
    async fn find_application(
        &self,
        job_id: i64,
        applicant_id: i64,
    ) -> Result<Option<Application>, AppError>;
    async fn create_application(&self, new: NewApplication) -> Result<Application, AppError>;
    /// Applications to jobs posted by `recruiter_id`, newest first.
    async fn list_applications_for_recruiter(
        &self,
        recruiter_id: i64,
    ) -> Result<Vec<ApplicationDetail>, AppError>;
    /// Updates the status only if the application belongs to one of the
    /// recruiter's jobs. `None` when no such application exists.
    async fn set_application_status(
        &self,
        application_id: i64,
        recruiter_id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, AppError>;

    // Bookmarks
    async fn find_bookmark(&self, user_id: i64, job_id: i64) -> Result<Option<Bookmark>, AppError>;
    async fn create_bookmark(&self, user_id: i64, job_id: i64) -> Result<Bookmark, AppError>;
    async fn delete_bookmark(&self, id: i64) -> Result<(), AppError>;
    /// The user's bookmarks on approved jobs, newest first.
    async fn list_bookmarks(&self, user_id: i64) -> Result<Vec<BookmarkedJob>, AppError>;
}
