//! Port for student profile persistence.

use async_trait::async_trait;

use crate::domain::profile::{GoogleId, Profile};
use crate::domain::ports::StorageError;

/// Port for student profile storage and retrieval.
///
/// Profiles are keyed by the identifier they share with the owning account;
/// at most one profile exists per account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile with the given identifier, if any.
    async fn find_by_google_id(
        &self,
        google_id: &GoogleId,
    ) -> Result<Option<Profile>, StorageError>;

    /// Insert or replace the profile record.
    async fn save(&self, profile: &Profile) -> Result<(), StorageError>;

    /// Remove the profile record.
    ///
    /// Deleting an unknown identifier is not an error.
    async fn delete(&self, google_id: &GoogleId) -> Result<(), StorageError>;
}
