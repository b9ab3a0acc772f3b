// The user directory capability
// Decision: One narrow lookup boundary, implemented once, consumed by both
// the credential service and the request authenticators

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CreateUser, UserRow};

/// Storage failures the auth core can act on. Callers only ever distinguish
/// `Duplicate` from everything else; absence of a row is `Ok(None)` on the
/// lookup methods, not an error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint violation on username or email
    #[error("user with this email or username already exists")]
    Duplicate,

    /// Any other database failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Lookup and creation of users, the only persistence capability the
/// authentication core depends on.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn create_user(&self, input: CreateUser) -> Result<UserRow, StoreError>;

    async fn user_by_id(&self, id: Uuid) -> Result<Option<UserRow>, StoreError>;

    async fn user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError>;

    async fn user_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError>;

    async fn user_by_api_key(&self, api_key: &str) -> Result<Option<UserRow>, StoreError>;
}
