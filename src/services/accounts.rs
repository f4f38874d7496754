use validator::Validate;

use crate::auth::{
    hash_password, verify_password, AuthResponse, LoginRequest, RegisterRequest, TokenService,
};
use crate::error::AppError;
use crate::models::user::{normalize_email, User};
use crate::store::Store;

const INVALID_LOGIN: &str = "Invalid email or password";

/// Creates an account. Emails are unique after normalization.
pub async fn register(store: &dyn Store, input: RegisterRequest) -> Result<User, AppError> {
    input.validate()?;

    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    let email = normalize_email(&input.email);

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&input.password)?;
    let user = store
        .insert_user(&User::new(name.to_string(), email, password_hash))
        .await?;

    log::info!("Registered user {}", user.id);
    Ok(user)
}

/// Checks credentials and issues a token. Unknown emails and wrong passwords
/// fail the same way.
pub async fn login(
    store: &dyn Store,
    tokens: &TokenService,
    input: LoginRequest,
) -> Result<AuthResponse, AppError> {
    input.validate()?;

    let user = store
        .find_user_by_email(&normalize_email(&input.email))
        .await?
        .ok_or_else(|| AppError::BadRequest(INVALID_LOGIN.into()))?;

    if !verify_password(&input.password, &user.password_hash)? {
        return Err(AppError::BadRequest(INVALID_LOGIN.into()));
    }

    Ok(AuthResponse {
        token: tokens.generate_token(user.id)?,
        user_id: user.id,
    })
}
