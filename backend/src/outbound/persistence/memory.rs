//! In-memory persistence adapters.
//!
//! Thread-safe map-backed implementations of the repository ports. Lock
//! poisoning is recovered rather than propagated; the maps hold plain data,
//! so a panicking writer cannot leave them logically inconsistent.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::account::Account;
use crate::domain::ports::{AccountRepository, PictureStore, ProfileRepository, StorageError};
use crate::domain::profile::{GoogleId, Profile};

/// Map-backed [`AccountRepository`].
#[derive(Debug, Default)]
pub struct MemoryAccountRepository {
    records: RwLock<HashMap<String, Account>>,
}

impl MemoryAccountRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_google_id(
        &self,
        google_id: &GoogleId,
    ) -> Result<Option<Account>, StorageError> {
        let records = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(google_id.as_ref()).cloned())
    }

    async fn save(&self, account: &Account) -> Result<(), StorageError> {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        records.insert(account.google_id.as_ref().to_owned(), account.clone());
        Ok(())
    }

    async fn delete(&self, google_id: &GoogleId) -> Result<(), StorageError> {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        records.remove(google_id.as_ref());
        Ok(())
    }
}

/// Map-backed [`ProfileRepository`].
#[derive(Debug, Default)]
pub struct MemoryProfileRepository {
    records: RwLock<HashMap<String, Profile>>,
}

impl MemoryProfileRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn find_by_google_id(
        &self,
        google_id: &GoogleId,
    ) -> Result<Option<Profile>, StorageError> {
        let records = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(google_id.as_ref()).cloned())
    }

    async fn save(&self, profile: &Profile) -> Result<(), StorageError> {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        records.insert(profile.google_id.as_ref().to_owned(), profile.clone());
        Ok(())
    }

    async fn delete(&self, google_id: &GoogleId) -> Result<(), StorageError> {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        records.remove(google_id.as_ref());
        Ok(())
    }
}

/// [`PictureStore`] that records deletions instead of talking to a blob
/// service.
#[derive(Debug, Default)]
pub struct MemoryPictureStore {
    deleted: RwLock<Vec<String>>,
}

impl MemoryPictureStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys deleted so far, in order.
    #[must_use]
    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl PictureStore for MemoryPictureStore {
    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut deleted = self
            .deleted
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        deleted.push(key.to_owned());
        Ok(())
    }
}
