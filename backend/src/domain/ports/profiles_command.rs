//! Driving port for mutating student profiles.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::profile::{GoogleId, Profile, ProfileUpdate};

/// Write side of the profile lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfilesCommand: Send + Sync {
    /// Apply `update` to the stored profile, creating it with default values
    /// first when missing.
    ///
    /// Returns the profile as persisted. The modification timestamp is only
    /// bumped when the update actually changes something.
    async fn update_profile(
        &self,
        google_id: &GoogleId,
        update: ProfileUpdate,
    ) -> Result<Profile, Error>;

    /// Delete the stored profile and its picture blob.
    ///
    /// Fails silently when no profile exists.
    async fn delete_profile(&self, google_id: &GoogleId) -> Result<(), Error>;
}
