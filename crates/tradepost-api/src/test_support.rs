// In-memory UserDirectory for tests.
// Mirrors the Postgres behavior the auth core relies on: absence is
// Ok(None), duplicate username/email is StoreError::Duplicate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use tradepost_storage::{CreateUser, StoreError, UserDirectory, UserRow};

#[derive(Default)]
pub struct InMemoryDirectory {
    users: Mutex<Vec<UserRow>>,
    fail: AtomicBool,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Make every subsequent call fail with a database error, for
    /// store-outage tests.
    pub fn fail_requests(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn insert(&self, user: UserRow) {
        self.users.lock().unwrap().push(user);
    }

    pub fn seeded_user(
        username: &str,
        email: &str,
        password_hash: &str,
        api_key: Option<&str>,
    ) -> UserRow {
        let now = Utc::now();
        UserRow {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            api_key: api_key.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(StoreError::Database(sqlx::Error::PoolClosed))
        } else {
            Ok(())
        }
    }

    fn find(&self, pred: impl Fn(&UserRow) -> bool) -> Option<UserRow> {
        self.users.lock().unwrap().iter().find(|u| pred(u)).cloned()
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn create_user(&self, input: CreateUser) -> Result<UserRow, StoreError> {
        self.check_available()?;
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.username == input.username || u.email == input.email)
        {
            return Err(StoreError::Duplicate);
        }

        let now = Utc::now();
        let row = UserRow {
            id: Uuid::new_v4(),
            username: input.username,
            email: input.email,
            password_hash: input.password_hash,
            api_key: None,
            created_at: now,
            updated_at: now,
        };
        users.push(row.clone());
        Ok(row)
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<UserRow>, StoreError> {
        self.check_available()?;
        Ok(self.find(|u| u.id == id))
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        self.check_available()?;
        Ok(self.find(|u| u.email == email))
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError> {
        self.check_available()?;
        Ok(self.find(|u| u.username == username))
    }

    async fn user_by_api_key(&self, api_key: &str) -> Result<Option<UserRow>, StoreError> {
        self.check_available()?;
        Ok(self.find(|u| u.api_key.as_deref() == Some(api_key)))
    }
}
