use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::{error, info, warn};

use crate::db::{Store, StoreError};
use crate::errors::AppError;
use crate::models::{LoginRequest, LoginResponse, SignupRequest};
use crate::services::session::SessionIssuer;

/// Argon2id with a fresh random salt, encoded as a PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            error!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Password task failed: {}", e)))
}

fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("Password cannot be empty".into()));
    }
    Ok(())
}

pub async fn signup(store: &dyn Store, req: SignupRequest) -> Result<(), AppError> {
    let email = req.email.trim().to_string();
    validate_credentials(&email, &req.password)?;

    if store.find_user_by_email(&email).await?.is_some() {
        warn!("Signup rejected, email already registered: {}", email);
        return Err(AppError::Conflict(format!("Email {} is already registered", email)));
    }

    let password = req.password;
    let password_hash = run_blocking(move || hash_password(&password)).await??;

    match store.create_user(&email, &password_hash).await {
        Ok(user) => {
            info!("Registered user {} ({})", user.id, user.email);
            Ok(())
        }
        Err(StoreError::Duplicate(_)) => {
            warn!("Signup lost race for email {}", email);
            Err(AppError::Conflict(format!("Email {} is already registered", email)))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login(
    store: &dyn Store,
    sessions: &dyn SessionIssuer,
    req: LoginRequest,
) -> Result<LoginResponse, AppError> {
    let email = req.email.trim().to_string();

    let Some(user) = store.find_user_by_email(&email).await? else {
        info!("Login failed: unknown email {}", email);
        return Err(AppError::InvalidCredentials);
    };

    let password = req.password;
    let password_hash = user.password_hash.clone();
    let matches = run_blocking(move || verify_password(&password, &password_hash)).await?;

    if !matches {
        info!("Login failed: wrong password for user {}", user.id);
        return Err(AppError::InvalidCredentials);
    }

    let token = sessions.issue(user.id)?;
    info!("User {} logged in", user.id);

    Ok(LoginResponse {
        message: "Login successful".to_string(),
        user_id: user.id,
        token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(verify_password("hunter2", &first));
        assert!(!verify_password("hunter3", &first));
    }

    #[test]
    fn test_unparseable_hash_never_verifies() {
        assert!(!verify_password("anything", "plaintext"));
    }

    #[test]
    fn test_credentials_validation() {
        assert!(validate_credentials("a@b.com", "pw").is_ok());
        assert!(matches!(validate_credentials("", "pw"), Err(AppError::Validation(_))));
        assert!(matches!(validate_credentials("not-an-email", "pw"), Err(AppError::Validation(_))));
        assert!(matches!(validate_credentials("a@b.com", ""), Err(AppError::Validation(_))));
    }
}
