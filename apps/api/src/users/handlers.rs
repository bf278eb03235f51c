use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::auth::Principal;
use crate::errors::AppError;
use crate::models::user::{NewUser, User};
use crate::state::AppState;
use crate::users::validate_signup;

/// POST /api/v1/users
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(request): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let new_user = validate_signup(request)?;
    let user = state.store.create_user(new_user).await?;
    info!(user_id = user.id, role = %user.role, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/me
pub async fn handle_me(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<User>, AppError> {
    state
        .store
        .get_user(principal.user_id)
        .await?
        .map(Json)
        .ok_or(AppError::Unauthorized)
}
