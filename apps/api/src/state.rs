use std::sync::Arc;

use crate::config::Config;
use crate::storage::ResumeStorage;
use crate::store::JobBoardStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Relational storage. PostgreSQL in production.
    pub store: Arc<dyn JobBoardStore>,
    /// Uploaded application resumes (S3 / MinIO).
    pub resumes: Arc<dyn ResumeStorage>,
    pub config: Config,
}
