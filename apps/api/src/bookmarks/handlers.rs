use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::auth::{Action, Principal};
use crate::bookmarks::toggle_bookmark;
use crate::errors::AppError;
use crate::jobs::{visible_job, JobView};
use crate::models::bookmark::BookmarkedJob;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub job_id: i64,
    pub bookmarked: bool,
}

#[derive(Debug, Serialize)]
pub struct BookmarkEntry {
    pub bookmark_id: i64,
    pub bookmarked_at: chrono::DateTime<chrono::Utc>,
    pub job: JobView,
}

impl From<BookmarkedJob> for BookmarkEntry {
    fn from(b: BookmarkedJob) -> Self {
        BookmarkEntry {
            bookmark_id: b.bookmark_id,
            bookmarked_at: b.bookmarked_at,
            job: b.job.into(),
        }
    }
}

/// POST /api/v1/jobs/:id/bookmark
pub async fn handle_toggle_bookmark(
    State(state): State<AppState>,
    principal: Principal,
    Path(job_id): Path<i64>,
) -> Result<Json<ToggleResponse>, AppError> {
    principal.require(Action::ToggleBookmark)?;

    let job = visible_job(state.store.as_ref(), job_id).await?;
    let bookmarked = toggle_bookmark(state.store.as_ref(), principal.user_id, job.id).await?;
    Ok(Json(ToggleResponse {
        job_id: job.id,
        bookmarked,
    }))
}

/// GET /api/v1/bookmarks
pub async fn handle_list_bookmarks(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<BookmarkEntry>>, AppError> {
    principal.require(Action::ViewBookmarks)?;

    let bookmarks = state.store.list_bookmarks(principal.user_id).await?;
    Ok(Json(bookmarks.into_iter().map(BookmarkEntry::from).collect()))
}
