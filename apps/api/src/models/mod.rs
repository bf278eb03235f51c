pub mod application;
pub mod bookmark;
pub mod job;
pub mod skills;
pub mod user;

use crate::errors::AppError;

/// Stored enum text that no longer parses is a server fault, not bad input.
pub(crate) fn corrupt_column(column: &'static str) -> impl Fn(AppError) -> AppError {
    move |e| AppError::Internal(anyhow::anyhow!("Unreadable value in {column}: {e}"))
}
