use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::corrupt_column;
use crate::models::skills::Skills;

/// Posting lifecycle. Only `Approved` jobs are publicly visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Pending => "pending",
            JobStatus::Approved => "approved",
            JobStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(JobStatus::Draft),
            "pending" => Ok(JobStatus::Pending),
            "approved" => Ok(JobStatus::Approved),
            "rejected" => Ok(JobStatus::Rejected),
            other => Err(AppError::Validation(format!("Unknown job status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub skills: String,
    pub company_name: String,
    pub posted_by: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub skills: Skills,
    pub company_name: String,
    pub posted_by: i64,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = AppError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(Job {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            min_salary: row.min_salary,
            max_salary: row.max_salary,
            skills: Skills::from_csv(&row.skills),
            company_name: row.company_name,
            posted_by: row.posted_by,
            status: row.status.parse().map_err(corrupt_column("jobs.status"))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Job {
    pub fn is_visible(&self) -> bool {
        self.status == JobStatus::Approved
    }

    /// Human-readable salary band. Zero bounds count as unset.
    pub fn salary_range(&self) -> String {
        let min = self.min_salary.filter(|v| *v != 0);
        let max = self.max_salary.filter(|v| *v != 0);
        match (min, max) {
            (Some(lo), Some(hi)) => format!("{} - {}", group_thousands(lo), group_thousands(hi)),
            (Some(lo), None) => format!("{}+", group_thousands(lo)),
            (None, Some(hi)) => format!("Up to {}", group_thousands(hi)),
            (None, None) => "—".to_string(),
        }
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Validated input for a new posting. Status is always `Pending` on insert.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub location: String,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub skills: Skills,
    pub company_name: String,
    pub posted_by: i64,
}
