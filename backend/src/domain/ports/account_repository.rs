//! Port for account persistence.

use async_trait::async_trait;

use crate::domain::account::Account;
use crate::domain::profile::GoogleId;
use crate::domain::ports::StorageError;

/// Port for account storage and retrieval.
///
/// Implementations provide durable storage keyed by the account identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetch the account with the given identifier, if any.
    async fn find_by_google_id(
        &self,
        google_id: &GoogleId,
    ) -> Result<Option<Account>, StorageError>;

    /// Insert or replace the account record.
    async fn save(&self, account: &Account) -> Result<(), StorageError>;

    /// Remove the account record.
    ///
    /// Deleting an unknown identifier is not an error.
    async fn delete(&self, google_id: &GoogleId) -> Result<(), StorageError>;
}
