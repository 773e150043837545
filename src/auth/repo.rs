use std::path::PathBuf;

use async_trait::async_trait;

use crate::auth::repo_types::UserRecord;
use crate::storage::{JsonStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("username already exists")]
    Duplicate,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Durable user records keyed by username.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Append a record and persist it. The uniqueness check and the write
    /// happen under one lock.
    async fn append(&self, record: UserRecord) -> Result<(), RepoError>;
}

/// `UserRepository` backed by a JSON file.
pub struct JsonUserRepository {
    store: JsonStore<UserRecord>,
}

impl JsonUserRepository {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self {
            store: JsonStore::open(path).await?,
        })
    }
}

#[async_trait]
impl UserRepository for JsonUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.store.find(|u| u.user_name == username).await)
    }

    async fn append(&self, record: UserRecord) -> Result<(), RepoError> {
        let mut txn = self.store.begin().await;
        if txn.items().iter().any(|u| u.user_name == record.user_name) {
            return Err(RepoError::Duplicate);
        }
        txn.items_mut().push(record);
        txn.commit().await?;
        Ok(())
    }
}
