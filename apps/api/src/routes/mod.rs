pub mod health;


use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::bookmarks::handlers as bookmarks;
use crate::jobs::{handlers as jobs, moderation};
use crate::recommend::handlers as recommend;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/v1/users", post(users::handle_signup))
        .route("/api/v1/me", get(users::handle_me))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route(
            "/api/v1/jobs/:id/apply",
            post(applications::handle_apply).layer(upload_limit.clone()),
        )
        .route(
            "/api/v1/jobs/:id/bookmark",
            post(bookmarks::handle_toggle_bookmark),
        )
        // Seeker / recruiter views
        .route("/api/v1/bookmarks", get(bookmarks::handle_list_bookmarks))
        .route(
            "/api/v1/applications/manage",
            get(applications::handle_manage_applications),
        )
        .route(
            "/api/v1/applications/:id/status",
            post(applications::handle_update_status),
        )
        .route(
            "/api/v1/recommendations",
            post(recommend::handle_recommendations).layer(upload_limit),
        )
        // Moderation (staff)
        .route(
            "/api/v1/moderation/jobs",
            get(moderation::handle_moderation_queue).post(moderation::handle_moderate_jobs),
        )
        .route(
            "/api/v1/moderation/jobs/:id",
            delete(moderation::handle_delete_job),
        )
        .with_state(state)
}
