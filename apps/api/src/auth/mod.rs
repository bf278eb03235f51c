//! Authenticated principals. Authentication itself happens upstream; the
//! gateway forwards the user's id in `x-user-id` and we resolve the role here.

pub mod policy;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::models::user::{Role, User};
use crate::state::AppState;

pub use policy::{authorize, Action, Decision};

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
    pub is_staff: bool,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Principal {
            user_id: user.id,
            role: user.role,
            is_staff: user.is_staff,
        }
    }
}

impl Principal {
    /// Runs the policy check; a denial short-circuits the handler with a redirect.
    pub fn require(&self, action: Action) -> Result<(), AppError> {
        match authorize(self, action) {
            Decision::Allow => Ok(()),
            Decision::Deny { redirect_to } => {
                tracing::debug!(user_id = self.user_id, ?action, "Action denied");
                Err(AppError::Redirect(redirect_to))
            }
        }
    }
}

/// Principal for routes that also serve anonymous callers.
pub struct MaybePrincipal(pub Option<Principal>);

async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<Principal>, AppError> {
    let Some(raw) = parts.headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    let user_id = raw
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .ok_or(AppError::Unauthorized)?;
    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Some(Principal::from(&user)))
}

#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve(parts, state).await?.ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybePrincipal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybePrincipal(resolve(parts, state).await?))
    }
}
