pub mod handlers;

use crate::errors::AppError;
use crate::models::user::NewUser;

/// Normalises and checks signup input. Uniqueness is left to the store.
pub fn validate_signup(new: NewUser) -> Result<NewUser, AppError> {
    let username = new.username.trim().to_string();
    let email = new.email.trim().to_lowercase();

    if username.is_empty() {
        return Err(AppError::Validation("username is required".to_string()));
    }
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(AppError::Validation("Enter a valid email address".to_string()));
    }

    Ok(NewUser {
        username,
        email,
        role: new.role,
    })
}
