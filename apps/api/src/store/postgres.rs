use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::errors::AppError;
use crate::jobs::filter::{like_pattern, JobFilter};
use crate::models::application::{
    Application, ApplicationDetail, ApplicationRow, ApplicationStatus, NewApplication,
};
use crate::models::bookmark::{Bookmark, BookmarkedJob};
use crate::models::job::{Job, JobRow, JobStatus, NewJob};
use crate::models::user::{NewUser, User, UserRow};
use crate::store::JobBoardStore;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ApplicationDetailRow {
    #[sqlx(flatten)]
    application: ApplicationRow,
    job_title: String,
    company_name: String,
    applicant_username: String,
    applicant_email: String,
}

#[derive(FromRow)]
struct BookmarkedJobRow {
    bookmark_id: i64,
    bookmarked_at: DateTime<Utc>,
    #[sqlx(flatten)]
    job: JobRow,
}

fn into_jobs(rows: Vec<JobRow>) -> Result<Vec<Job>, AppError> {
    rows.into_iter().map(Job::try_from).collect()
}

#[async_trait]
impl JobBoardStore for PgStore {
    async fn create_user(&self, new: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (username, email, role) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&new.username)
        .bind(&new.email)
        .bind(new.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_insert(e, "A user with that username or email"))?;
        row.try_into()
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn create_job(&self, new: NewJob) -> Result<Job, AppError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (title, description, location, min_salary, max_salary,
                 skills, company_name, posted_by, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.location)
        .bind(new.min_salary)
        .bind(new.max_salary)
        .bind(new.skills.to_csv())
        .bind(&new.company_name)
        .bind(new.posted_by)
        .bind(JobStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn get_job(&self, id: i64) -> Result<Option<Job>, AppError> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Job::try_from)
            .transpose()
    }

    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, AppError> {
        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT * FROM jobs
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR title ILIKE $2 OR description ILIKE $2 OR skills ILIKE $6)
              AND ($3::text IS NULL OR location ILIKE $3)
              AND ($4::bigint IS NULL OR max_salary >= $4)
              AND ($5::bigint IS NULL OR min_salary <= $5)
            ORDER BY id ASC
            "#,
        )
        .bind(filter.status.map(JobStatus::as_str))
        .bind(filter.text.as_deref().map(like_pattern))
        .bind(filter.location.as_deref().map(like_pattern))
        .bind(filter.min_salary)
        .bind(filter.max_salary)
        .bind(filter.skills_needle().as_deref().map(like_pattern))
        .fetch_all(&self.pool)
        .await?;
        into_jobs(rows)
    }

    async fn set_job_status(&self, ids: &[i64], status: JobStatus) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE jobs SET status = $1, updated_at = NOW() WHERE id = ANY($2)")
                .bind(status.as_str())
                .bind(ids)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    async fn delete_job(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_application(
        &self,
        job_id: i64,
        applicant_id: i64,
    ) -> Result<Option<Application>, AppError> {
        sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE job_id = $1 AND applicant_id = $2",
        )
        .bind(job_id)
        .bind(applicant_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Application::try_from)
        .transpose()
    }

    async fn create_application(&self, new: NewApplication) -> Result<Application, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (job_id, applicant_id, resume_key, cover_letter, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new.job_id)
        .bind(new.applicant_id)
        .bind(&new.resume_key)
        .bind(&new.cover_letter)
        .bind(ApplicationStatus::Applied.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_insert(e, "Application"))?;
        row.try_into()
    }

    async fn list_applications_for_recruiter(
        &self,
        recruiter_id: i64,
    ) -> Result<Vec<ApplicationDetail>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationDetailRow>(
            r#"
            SELECT a.*,
                   j.title AS job_title,
                   j.company_name,
                   u.username AS applicant_username,
                   u.email AS applicant_email
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            JOIN users u ON u.id = a.applicant_id
            WHERE j.posted_by = $1
            ORDER BY a.created_at DESC, a.id DESC
            "#,
        )
        .bind(recruiter_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<ApplicationDetail, AppError> {
                Ok(ApplicationDetail {
                    application: row.application.try_into()?,
                    job_title: row.job_title,
                    company_name: row.company_name,
                    applicant_username: row.applicant_username,
                    applicant_email: row.applicant_email,
                })
            })
            .collect()
    }

    async fn set_application_status(
        &self,
        application_id: i64,
        recruiter_id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, AppError> {
        sqlx::query_as::<_, ApplicationRow>(
            r#"
            UPDATE applications a
            SET status = $1, updated_at = NOW()
            FROM jobs j
            WHERE a.id = $2 AND j.id = a.job_id AND j.posted_by = $3
            RETURNING a.*
            "#,
        )
        .bind(status.as_str())
        .bind(application_id)
        .bind(recruiter_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Application::try_from)
        .transpose()
    }

    async fn find_bookmark(&self, user_id: i64, job_id: i64) -> Result<Option<Bookmark>, AppError> {
        Ok(sqlx::query_as::<_, Bookmark>(
            "SELECT * FROM bookmarks WHERE user_id = $1 AND job_id = $2",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_bookmark(&self, user_id: i64, job_id: i64) -> Result<Bookmark, AppError> {
        sqlx::query_as::<_, Bookmark>(
            "INSERT INTO bookmarks (user_id, job_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_insert(e, "Bookmark"))
    }

    async fn delete_bookmark(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM bookmarks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_bookmarks(&self, user_id: i64) -> Result<Vec<BookmarkedJob>, AppError> {
        let rows = sqlx::query_as::<_, BookmarkedJobRow>(
            r#"
            SELECT j.*, b.id AS bookmark_id, b.created_at AS bookmarked_at
            FROM bookmarks b
            JOIN jobs j ON j.id = b.job_id
            WHERE b.user_id = $1 AND j.status = $2
            ORDER BY b.created_at DESC, b.id DESC
            "#,
        )
        .bind(user_id)
        .bind(JobStatus::Approved.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<BookmarkedJob, AppError> {
                Ok(BookmarkedJob {
                    bookmark_id: row.bookmark_id,
                    bookmarked_at: row.bookmarked_at,
                    job: row.job.try_into()?,
                })
            })
            .collect()
    }
}
