// Credential service: registration and login
// Two independent flows, no shared state across calls. Each does exactly
// one store round-trip; transient store failures propagate, nothing is
// retried here.

use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use thiserror::Error;

use tradepost_contracts::CreateUserRequest;
use tradepost_storage::{CreateUser, StoreError, UserDirectory, UserRow};

use super::jwt::TokenService;
use super::password::{hash_password, verify_password};

// Hashed once at construction and verified against whenever a login names
// an unknown email, so that path costs the same as a wrong password and
// never reveals whether the identifier exists.
const LOGIN_PADDING_SECRET: &str = "tradepost-login-padding";

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("user with this email or username already exists")]
    UserAlreadyExists,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum LoginError {
    /// Unknown identifier and wrong password collapse into this one kind.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub struct AuthService {
    directory: Arc<dyn UserDirectory>,
    tokens: Arc<TokenService>,
    token_ttl: Duration,
    dummy_hash: String,
}

impl AuthService {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        tokens: Arc<TokenService>,
        token_ttl: std::time::Duration,
    ) -> anyhow::Result<Self> {
        let token_ttl = Duration::from_std(token_ttl).context("token TTL out of range")?;
        let dummy_hash =
            hash_password(LOGIN_PADDING_SECRET).context("failed to hash login padding secret")?;

        Ok(Self {
            directory,
            tokens,
            token_ttl,
            dummy_hash,
        })
    }

    /// Create a new user with a hashed secret. The plaintext password is
    /// dropped here and never persisted or logged.
    pub async fn register(&self, req: &CreateUserRequest) -> Result<UserRow, RegistrationError> {
        let password_hash = hash_password(&req.password)
            .context("failed to hash password during registration")?;

        let user = self
            .directory
            .create_user(CreateUser {
                username: req.username.clone(),
                email: req.email.clone(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate => RegistrationError::UserAlreadyExists,
                other => RegistrationError::Internal(
                    anyhow::Error::new(other).context("failed to create user"),
                ),
            })?;

        Ok(user)
    }

    /// Authenticate by email and password, returning a session token and
    /// the user on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, UserRow), LoginError> {
        let user = match self.directory.user_by_email(email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                // Burn a verification so unknown-email latency matches
                // wrong-password latency.
                let _ = verify_password(password, &self.dummy_hash);
                return Err(LoginError::InvalidCredentials);
            }
            Err(err) => {
                return Err(LoginError::Internal(
                    anyhow::Error::new(err).context("failed to get user by email"),
                ));
            }
        };

        if !verify_password(password, &user.password_hash) {
            return Err(LoginError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(user.id, Utc::now(), self.token_ttl)
            .context("failed to sign session token")?;

        Ok((token, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryDirectory;

    const TTL: std::time::Duration = std::time::Duration::from_secs(3600);

    fn fixture() -> (Arc<InMemoryDirectory>, Arc<TokenService>, AuthService) {
        let directory = InMemoryDirectory::shared();
        let tokens = Arc::new(TokenService::new("test-secret"));
        let service = AuthService::new(directory.clone(), tokens.clone(), TTL).unwrap();
        (directory, tokens, service)
    }

    fn alice() -> CreateUserRequest {
        CreateUserRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "longenoughpw".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_stores_a_hash_not_the_password() {
        let (_, _, service) = fixture();

        let user = service.register(&alice()).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "longenoughpw");
        assert!(verify_password("longenoughpw", &user.password_hash));
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let (_, _, service) = fixture();
        service.register(&alice()).await.unwrap();

        let mut second = alice();
        second.username = "alice2".to_string();
        let err = service.register(&second).await.unwrap_err();
        assert!(matches!(err, RegistrationError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_login_issues_a_token_for_the_user() {
        let (_, tokens, service) = fixture();
        let registered = service.register(&alice()).await.unwrap();

        let (token, user) = service
            .login("alice@example.com", "longenoughpw")
            .await
            .unwrap();
        assert_eq!(user.id, registered.id);

        let subject = tokens.verify(&token, Utc::now()).unwrap();
        assert_eq!(subject, registered.id.to_string());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (_, _, service) = fixture();
        service.register(&alice()).await.unwrap();

        // Unknown email and wrong password return the same kind.
        let unknown = service
            .login("nobody@example.com", "longenoughpw")
            .await
            .unwrap_err();
        assert!(matches!(unknown, LoginError::InvalidCredentials));

        let wrong = service
            .login("alice@example.com", "wrongpassword")
            .await
            .unwrap_err();
        assert!(matches!(wrong, LoginError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_store_failure_is_internal() {
        let (directory, _, service) = fixture();
        directory.fail_requests();

        let err = service
            .login("alice@example.com", "longenoughpw")
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::Internal(_)));
    }
}
