//! In-process `JobBoardStore` used by the test suite. Mirrors the schema's
//! uniqueness and cascade rules.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::jobs::filter::JobFilter;
use crate::models::application::{
    Application, ApplicationDetail, ApplicationStatus, NewApplication,
};
use crate::models::bookmark::{Bookmark, BookmarkedJob};
use crate::models::job::{Job, JobStatus, NewJob};
use crate::models::user::{NewUser, User};
use crate::store::JobBoardStore;

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    jobs: Vec<Job>,
    applications: Vec<Application>,
    bookmarks: Vec<Bookmark>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    /// When set, the next application/bookmark lookup reports "absent" even if
    /// a row exists, the way a concurrent request sees it before the other commits.
    stale_next_lookup: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn simulate_concurrent_insert(&self) {
        self.stale_next_lookup.store(true, Ordering::SeqCst);
    }

    fn lookup_is_stale(&self) -> bool {
        self.stale_next_lookup.swap(false, Ordering::SeqCst)
    }

    pub async fn grant_staff(&self, user_id: i64) {
        let mut t = self.tables.write().await;
        if let Some(user) = t.users.iter_mut().find(|u| u.id == user_id) {
            user.is_staff = true;
        }
    }

    pub async fn application_count(&self) -> usize {
        self.tables.read().await.applications.len()
    }

    pub async fn bookmark_count(&self) -> usize {
        self.tables.read().await.bookmarks.len()
    }
}

#[async_trait]
impl JobBoardStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<User, AppError> {
        let mut t = self.tables.write().await;
        if t
            .users
            .iter()
            .any(|u| u.email == new.email || u.username == new.username)
        {
            return Err(AppError::Conflict(
                "A user with that username or email already exists".to_string(),
            ));
        }
        let user = User {
            id: t.next_id(),
            username: new.username,
            email: new.email,
            role: new.role,
            is_staff: false,
            created_at: Utc::now(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_job(&self, new: NewJob) -> Result<Job, AppError> {
        let mut t = self.tables.write().await;
        let now = Utc::now();
        let job = Job {
            id: t.next_id(),
            title: new.title,
            description: new.description,
            location: new.location,
            min_salary: new.min_salary,
            max_salary: new.max_salary,
            skills: new.skills,
            company_name: new.company_name,
            posted_by: new.posted_by,
            status: JobStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        t.jobs.push(job.clone());
        Ok(job)
    }

    async fn get_job(&self, id: i64) -> Result<Option<Job>, AppError> {
        Ok(self.tables.read().await.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, AppError> {
        let t = self.tables.read().await;
        let mut jobs: Vec<Job> = t.jobs.iter().filter(|j| filter.matches(j)).cloned().collect();
        jobs.sort_by_key(|j| j.id);
        Ok(jobs)
    }

    async fn set_job_status(&self, ids: &[i64], status: JobStatus) -> Result<u64, AppError> {
        let mut t = self.tables.write().await;
        let mut changed = 0;
        for job in t.jobs.iter_mut().filter(|j| ids.contains(&j.id)) {
            job.status = status;
            job.updated_at = Utc::now();
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_job(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.tables.write().await;
        let before = t.jobs.len();
        t.jobs.retain(|j| j.id != id);
        if t.jobs.len() == before {
            return Ok(false);
        }
        t.applications.retain(|a| a.job_id != id);
        t.bookmarks.retain(|b| b.job_id != id);
        Ok(true)
    }

    async fn find_application(
        &self,
        job_id: i64,
        applicant_id: i64,
    ) -> Result<Option<Application>, AppError> {
        if self.lookup_is_stale() {
            return Ok(None);
        }
        Ok(self
            .tables
            .read()
            .await
            .applications
            .iter()
            .find(|a| a.job_id == job_id && a.applicant_id == applicant_id)
            .cloned())
    }

    async fn create_application(&self, new: NewApplication) -> Result<Application, AppError> {
        let mut t = self.tables.write().await;
        if t
            .applications
            .iter()
            .any(|a| a.job_id == new.job_id && a.applicant_id == new.applicant_id)
        {
            return Err(AppError::Conflict("Application already exists".to_string()));
        }
        let now = Utc::now();
        let application = Application {
            id: t.next_id(),
            job_id: new.job_id,
            applicant_id: new.applicant_id,
            resume_key: new.resume_key,
            cover_letter: new.cover_letter,
            status: ApplicationStatus::Applied,
            created_at: now,
            updated_at: now,
        };
        t.applications.push(application.clone());
        Ok(application)
    }

    async fn list_applications_for_recruiter(
        &self,
        recruiter_id: i64,
    ) -> Result<Vec<ApplicationDetail>, AppError> {
        let t = self.tables.read().await;
        let mut details = Vec::new();
        for application in t.applications.iter().rev() {
            let Some(job) = t
                .jobs
                .iter()
                .find(|j| j.id == application.job_id && j.posted_by == recruiter_id)
            else {
                continue;
            };
            let Some(applicant) = t.users.iter().find(|u| u.id == application.applicant_id) else {
                continue;
            };
            details.push(ApplicationDetail {
                application: application.clone(),
                job_title: job.title.clone(),
                company_name: job.company_name.clone(),
                applicant_username: applicant.username.clone(),
                applicant_email: applicant.email.clone(),
            });
        }
        Ok(details)
    }

    async fn set_application_status(
        &self,
        application_id: i64,
        recruiter_id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, AppError> {
        let mut t = self.tables.write().await;
        let owned_jobs: Vec<i64> = t
            .jobs
            .iter()
            .filter(|j| j.posted_by == recruiter_id)
            .map(|j| j.id)
            .collect();
        let Some(application) = t
            .applications
            .iter_mut()
            .find(|a| a.id == application_id && owned_jobs.contains(&a.job_id))
        else {
            return Ok(None);
        };
        application.status = status;
        application.updated_at = Utc::now();
        Ok(Some(application.clone()))
    }

    async fn find_bookmark(&self, user_id: i64, job_id: i64) -> Result<Option<Bookmark>, AppError> {
        if self.lookup_is_stale() {
            return Ok(None);
        }
        Ok(self
            .tables
            .read()
            .await
            .bookmarks
            .iter()
            .find(|b| b.user_id == user_id && b.job_id == job_id)
            .cloned())
    }

    async fn create_bookmark(&self, user_id: i64, job_id: i64) -> Result<Bookmark, AppError> {
        let mut t = self.tables.write().await;
        if t
            .bookmarks
            .iter()
            .any(|b| b.user_id == user_id && b.job_id == job_id)
        {
            return Err(AppError::Conflict("Bookmark already exists".to_string()));
        }
        let bookmark = Bookmark {
            id: t.next_id(),
            user_id,
            job_id,
            created_at: Utc::now(),
        };
        t.bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    async fn delete_bookmark(&self, id: i64) -> Result<(), AppError> {
        self.tables.write().await.bookmarks.retain(|b| b.id != id);
        Ok(())
    }

    async fn list_bookmarks(&self, user_id: i64) -> Result<Vec<BookmarkedJob>, AppError> {
        let t = self.tables.read().await;
        Ok(t.bookmarks
            .iter()
            .rev()
            .filter(|b| b.user_id == user_id)
            .filter_map(|b| {
                t.jobs
                    .iter()
                    .find(|j| j.id == b.job_id && j.is_visible())
                    .map(|job| BookmarkedJob {
                        bookmark_id: b.id,
                        bookmarked_at: b.created_at,
                        job: job.clone(),
                    })
            })
            .collect())
    }
}
