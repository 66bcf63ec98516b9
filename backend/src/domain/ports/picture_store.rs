//! Port for the binary store holding profile pictures.

use async_trait::async_trait;

use crate::domain::ports::StorageError;

/// Port for profile picture blobs, addressed by their reference key.
///
/// Uploads happen out of band through the binary store's own interface; this
/// port only covers the cleanup the profile lifecycle needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PictureStore: Send + Sync {
    /// Delete the blob behind `key`.
    ///
    /// Deleting an unknown key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
