//! Password accounts and cookie-backed admin sessions.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand_core::OsRng;
use sha2::{Digest, Sha256};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::repos::{
    CreateSessionParams, CreateUserParams, RepoError, SessionsRepo, UsersRepo,
};
use crate::domain::accounts::{normalize_display_name, normalize_email};
use crate::domain::entities::UserRecord;
use crate::domain::error::DomainError;
use crate::domain::types::UserRole;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    TooLong,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("invalid password hash format")]
    InvalidHash,
    #[error("password verification failed")]
    Mismatch,
}

pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong);
    }
    Ok(())
}

/// Hash a password into a PHC string carrying its own salt and parameters.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password(password)?;
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordError::Hash(err.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}

/// Hash verified in place of a stored one when the email is unknown.
static DECOY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password(&generate_token()).ok());

/// Verify against the stored hash, or against the decoy when there is none.
fn verify_credentials(password: &str, stored: Option<&str>) -> Result<(), PasswordError> {
    match stored {
        Some(hash) => verify_password(password, hash),
        None => {
            if let Some(decoy) = DECOY_HASH.as_deref() {
                let _ = verify_password(password, decoy);
            }
            Err(PasswordError::Mismatch)
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("no active session")]
    Unauthenticated,
    #[error("an account with this email already exists")]
    DuplicateEmail,
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("background task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub password: String,
}

/// A freshly opened session. `token` is only ever handed to the client.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub user: UserRecord,
    pub expires_at: OffsetDateTime,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UsersRepo>,
    sessions: Arc<dyn SessionsRepo>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UsersRepo>,
        sessions: Arc<dyn SessionsRepo>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            session_ttl,
        }
    }

    #[instrument(skip(self, command), fields(email = %command.email, role = %command.role))]
    pub async fn register_user(&self, command: RegisterUserCommand) -> Result<UserRecord, AuthError> {
        let email = normalize_email(&command.email)?;
        let name = normalize_display_name(&command.name)?;
        validate_password(&command.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password = command.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|err| AuthError::Task(err.to_string()))??;

        let user = self
            .users
            .create_user(CreateUserParams {
                email,
                name,
                role: command.role,
                password_hash,
            })
            .await
            .map_err(|err| match err {
                RepoError::Duplicate { .. } => AuthError::DuplicateEmail,
                other => AuthError::Repo(other),
            })?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Checks credentials and opens a session. Unknown emails and wrong
    /// passwords are reported identically.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AuthError> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
        let user = self.users.find_by_email(&email).await?;

        let candidate = password.to_string();
        let stored = user.as_ref().map(|user| user.password_hash.clone());
        tokio::task::spawn_blocking(move || verify_credentials(&candidate, stored.as_deref()))
            .await
            .map_err(|err| AuthError::Task(err.to_string()))?
            .map_err(|_| AuthError::InvalidCredentials)?;
        let user = user.ok_or(AuthError::InvalidCredentials)?;

        let token = generate_token();
        let expires_at = OffsetDateTime::now_utc() + self.session_ttl;
        self.sessions
            .create_session(CreateSessionParams {
                user_id: user.id,
                token_hash: hash_token(&token),
                expires_at,
            })
            .await?;

        info!(user_id = %user.id, "session opened");
        Ok(IssuedSession {
            token,
            user,
            expires_at,
        })
    }

    /// Resolves a session token to its user, discarding expired sessions.
    pub async fn authenticate(&self, token: &str) -> Result<UserRecord, AuthError> {
        let token_hash = hash_token(token);
        let session = self
            .sessions
            .find_by_token_hash(&token_hash)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        if session.is_expired(OffsetDateTime::now_utc()) {
            self.sessions.delete_by_token_hash(&token_hash).await?;
            return Err(AuthError::Unauthenticated);
        }

        self.users
            .find_by_id(session.user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }

    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.delete_by_token_hash(&hash_token(token)).await?;
        Ok(())
    }

    pub async fn purge_expired_sessions(&self) -> Result<u64, AuthError> {
        let removed = self
            .sessions
            .delete_expired(OffsetDateTime::now_utc())
            .await?;
        Ok(removed)
    }
}

pub fn hash_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_against_their_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("battery staple", &hash),
            Err(PasswordError::Mismatch)
        ));
    }

    #[test]
    fn password_length_is_bounded() {
        assert!(matches!(hash_password("short"), Err(PasswordError::TooShort)));
        let long = "x".repeat(MAX_PASSWORD_LENGTH + 1);
        assert!(matches!(validate_password(&long), Err(PasswordError::TooLong)));
    }

    #[test]
    fn malformed_hash_is_rejected() {
        assert!(matches!(
            verify_password("whatever1", "plaintext"),
            Err(PasswordError::InvalidHash)
        ));
    }

    #[test]
    fn unknown_accounts_are_checked_against_a_real_hash() {
        let decoy = DECOY_HASH.as_deref().expect("decoy hash");
        assert!(PasswordHash::new(decoy).is_ok());
        assert!(matches!(
            verify_credentials("correct horse", None),
            Err(PasswordError::Mismatch)
        ));

        let hash = hash_password("correct horse").unwrap();
        assert!(verify_credentials("correct horse", Some(&hash)).is_ok());
    }

    #[test]
    fn tokens_are_unique_and_hash_stably() {
        let first = generate_token();
        let second = generate_token();
        assert_ne!(first, second);
        assert_eq!(first.len(), 64);
        assert_eq!(hash_token(&first), hash_token(&first));
        assert_eq!(hash_token(&first).len(), 32);
    }
}
