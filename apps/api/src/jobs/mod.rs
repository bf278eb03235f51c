pub mod filter;
pub mod handlers;
pub mod moderation;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::job::{Job, NewJob};
use crate::models::skills::Skills;
use crate::store::JobBoardStore;

/// Job as returned to clients, with the display salary band.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    pub salary_range: String,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        let salary_range = job.salary_range();
        JobView { job, salary_range }
    }
}

/// Loads a job that the public may see. Anything not approved is a 404.
pub async fn visible_job(store: &dyn JobBoardStore, id: i64) -> Result<Job, AppError> {
    store
        .get_job(id)
        .await?
        .filter(Job::is_visible)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    /// Comma-separated, as typed.
    #[serde(default)]
    pub skills: String,
    pub company_name: Option<String>,
}

impl CreateJobRequest {
    pub fn validate(self, posted_by: i64) -> Result<NewJob, AppError> {
        let title = required("title", self.title)?;
        let description = required("description", self.description)?;
        let location = required("location", self.location)?;
        let company_name = required("company_name", self.company_name)?;

        for (name, value) in [("min_salary", self.min_salary), ("max_salary", self.max_salary)] {
            if value.is_some_and(|v| v < 0) {
                return Err(AppError::Validation(format!("{name} cannot be negative")));
            }
        }
        if let (Some(min), Some(max)) = (self.min_salary, self.max_salary) {
            if min > max {
                return Err(AppError::Validation(
                    "min_salary cannot exceed max_salary".to_string(),
                ));
            }
        }

        Ok(NewJob {
            title,
            description,
            location,
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            skills: Skills::from_csv(&self.skills),
            company_name,
            posted_by,
        })
    }
}

fn required(name: &str, value: Option<String>) -> Result<String, AppError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{name} is required"))),
    }
}
