use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::job::Job;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Bookmark {
    pub id: i64,
    pub user_id: i64,
    pub job_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookmarkedJob {
    pub bookmark_id: i64,
    pub bookmarked_at: DateTime<Utc>,
    pub job: Job,
}
