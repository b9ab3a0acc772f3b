// User service: sanitized lookups for the direct user endpoints.
// API-key resolution deliberately does NOT live here; the directory is the
// single owner of credential lookups and the middleware consumes it directly.

use std::sync::Arc;

use anyhow::{Context, Result};
use uuid::Uuid;

use tradepost_contracts::User;
use tradepost_storage::{UserDirectory, UserRow};

pub struct UserService {
    directory: Arc<dyn UserDirectory>,
}

impl UserService {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let row = self
            .directory
            .user_by_id(id)
            .await
            .context("failed to get user by id")?;
        Ok(row.as_ref().map(to_user))
    }
}

/// Map a stored row to the public representation. The password hash and
/// API key stop here.
pub fn to_user(row: &UserRow) -> User {
    User {
        id: row.id,
        username: row.username.clone(),
        email: row.email.clone(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}
