pub mod handlers;

use tracing::{debug, info};

use crate::errors::AppError;
use crate::store::JobBoardStore;

/// Flips the (user, job) bookmark and returns whether it now exists.
///
/// If a concurrent toggle inserts the row between our lookup and insert, the
/// toggle is re-run once against the committed state.
pub async fn toggle_bookmark(
    store: &dyn JobBoardStore,
    user_id: i64,
    job_id: i64,
) -> Result<bool, AppError> {
    match toggle_once(store, user_id, job_id).await {
        Err(AppError::Conflict(_)) => {
            debug!(user_id, job_id, "Bookmark insert raced, retrying toggle");
            toggle_once(store, user_id, job_id).await
        }
        result => result,
    }
}

async fn toggle_once(store: &dyn JobBoardStore, user_id: i64, job_id: i64) -> Result<bool, AppError> {
    match store.find_bookmark(user_id, job_id).await? {
        Some(existing) => {
            store.delete_bookmark(existing.id).await?;
            info!(user_id, job_id, "Bookmark removed");
            Ok(false)
        }
        None => {
            store.create_bookmark(user_id, job_id).await?;
            info!(user_id, job_id, "Bookmark added");
            Ok(true)
        }
    }
}
