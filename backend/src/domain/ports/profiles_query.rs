//! Driving port for reading student profiles.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::profile::{GoogleId, Profile};

/// Read side of the profile lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfilesQuery: Send + Sync {
    /// Fetch the profile for `google_id`.
    ///
    /// When no profile has been stored yet, the default-valued profile for
    /// that identifier is returned without being persisted.
    async fn fetch_profile(&self, google_id: &GoogleId) -> Result<Profile, Error>;
}
