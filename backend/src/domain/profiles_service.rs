//! Student profile domain service.
//!
//! Implements the profile driving ports on top of the profile repository and
//! the picture store. All sanitisation and validation happens here so every
//! write path shares one set of rules.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::error::Error;
use crate::domain::ports::{
    PictureStore, ProfileRepository, ProfilesCommand, ProfilesQuery, StorageError,
};
use crate::domain::profile::{GoogleId, Profile, ProfileUpdate};
use crate::domain::{sanitize, validation};

/// Profile service implementing [`ProfilesQuery`] and [`ProfilesCommand`].
#[derive(Clone)]
pub struct ProfilesService<P, S> {
    profiles: Arc<P>,
    pictures: Arc<S>,
}

impl<P, S> ProfilesService<P, S> {
    /// Create a new service over the given adapters.
    pub fn new(profiles: Arc<P>, pictures: Arc<S>) -> Self {
        Self { profiles, pictures }
    }
}

fn map_storage_error(error: StorageError) -> Error {
    Error::internal(error.to_string())
}

fn sanitise_update(update: ProfileUpdate) -> ProfileUpdate {
    ProfileUpdate {
        short_name: update.short_name.as_deref().map(sanitize::plain_text),
        email: update.email.as_deref().map(sanitize::plain_text),
        institute: update.institute.as_deref().map(sanitize::plain_text),
        nationality: update.nationality.as_deref().map(sanitize::plain_text),
        gender: update.gender,
        more_info: update.more_info.as_deref().map(sanitize::rich_text),
        picture_key: update.picture_key.as_deref().map(sanitize::plain_text),
    }
}

// Optional fields are only validated when present; an empty string clears
// the field, matching the default-valued creation contract.
fn invalidity_info(profile: &Profile) -> Vec<String> {
    let mut reasons = Vec::new();
    if !profile.short_name.is_empty() {
        reasons.extend(validation::person_name(&profile.short_name));
    }
    if !profile.email.is_empty() {
        reasons.extend(validation::email(&profile.email));
    }
    if !profile.institute.is_empty() {
        reasons.extend(validation::institute(&profile.institute));
    }
    if !profile.nationality.is_empty() {
        reasons.extend(validation::nationality(&profile.nationality));
    }
    reasons
}

#[async_trait]
impl<P, S> ProfilesQuery for ProfilesService<P, S>
where
    P: ProfileRepository,
    S: PictureStore,
{
    async fn fetch_profile(&self, google_id: &GoogleId) -> Result<Profile, Error> {
        let stored = self
            .profiles
            .find_by_google_id(google_id)
            .await
            .map_err(map_storage_error)?;
        Ok(stored.unwrap_or_else(|| Profile::with_defaults(google_id.clone())))
    }
}

#[async_trait]
impl<P, S> ProfilesCommand for ProfilesService<P, S>
where
    P: ProfileRepository,
    S: PictureStore,
{
    async fn update_profile(
        &self,
        google_id: &GoogleId,
        update: ProfileUpdate,
    ) -> Result<Profile, Error> {
        let existing = self
            .profiles
            .find_by_google_id(google_id)
            .await
            .map_err(map_storage_error)?;

        let mut updated = existing
            .clone()
            .unwrap_or_else(|| Profile::with_defaults(google_id.clone()));
        sanitise_update(update).apply_to(&mut updated);

        let reasons = invalidity_info(&updated);
        if !reasons.is_empty() {
            return Err(Error::invalid_parameter(reasons.join("; ")));
        }

        if let Some(stored) = existing {
            if stored.same_content(&updated) {
                return Ok(stored);
            }
        }

        updated.modified_at = Utc::now();
        self.profiles
            .save(&updated)
            .await
            .map_err(map_storage_error)?;
        Ok(updated)
    }

    async fn delete_profile(&self, google_id: &GoogleId) -> Result<(), Error> {
        let Some(profile) = self
            .profiles
            .find_by_google_id(google_id)
            .await
            .map_err(map_storage_error)?
        else {
            return Ok(());
        };

        if !profile.picture_key.is_empty() {
            self.pictures
                .delete(&profile.picture_key)
                .await
                .map_err(map_storage_error)?;
        }
        self.profiles
            .delete(google_id)
            .await
            .map_err(map_storage_error)
    }
}
