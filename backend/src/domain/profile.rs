//! Student profile entity and its update options.
//!
//! A profile holds the personal details a student chooses to share and
//! belongs to exactly one account, keyed by the shared identifier.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::sanitize;
use crate::domain::validation;

/// Validation failures raised when constructing profile components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    /// The identifier was empty once sanitised.
    EmptyGoogleId,
    /// The identifier failed the format or length checks.
    InvalidGoogleId(String),
    /// The gender value was not one of `male`, `female`, or `other`.
    InvalidGender(String),
}

impl fmt::Display for ProfileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGoogleId => write!(f, "user identifier must not be empty"),
            Self::InvalidGoogleId(reason) => write!(f, "{reason}"),
            Self::InvalidGender(value) => {
                write!(f, "'{value}' is not an accepted gender; use male, female, or other")
            }
        }
    }
}

impl std::error::Error for ProfileValidationError {}

/// Stable account/profile identifier issued by the identity provider.
///
/// ## Invariants
/// - Non-empty once sanitised (trimmed, default mail domain stripped).
/// - Satisfies the identifier format and length checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GoogleId(String);

impl GoogleId {
    /// Sanitise and validate a raw identifier.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ProfileValidationError> {
        let cleaned = sanitize::google_id(raw.as_ref());
        if cleaned.is_empty() {
            return Err(ProfileValidationError::EmptyGoogleId);
        }
        if let Some(reason) = validation::google_id(&cleaned) {
            return Err(ProfileValidationError::InvalidGoogleId(reason));
        }
        Ok(Self(cleaned))
    }
}

impl AsRef<str> for GoogleId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GoogleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<GoogleId> for String {
    fn from(value: GoogleId) -> Self {
        value.0
    }
}

/// Gender recorded on a student profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Gender {
    /// Self-described as male.
    Male,
    /// Self-described as female.
    Female,
    /// Anything else, including undisclosed. The creation default.
    #[default]
    Other,
}

impl Gender {
    /// Wire representation used by DTOs and storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = ProfileValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            unknown => Err(ProfileValidationError::InvalidGender(unknown.to_owned())),
        }
    }
}

/// Student profile record.
///
/// ## Invariants
/// - `modified_at` moves forward on every persisted mutation; a write that
///   changes nothing must not touch it.
/// - Text fields are sanitised before persistence (see the profiles service).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Identifier shared with the owning account.
    pub google_id: GoogleId,
    /// Shortened name shown alongside feedback.
    pub short_name: String,
    /// Long-term personal email, distinct from the course email.
    pub email: String,
    /// University, school, or institute.
    pub institute: String,
    /// Nationality, useful for exchange students.
    pub nationality: String,
    /// Self-described gender.
    pub gender: Gender,
    /// Free-text bio; HTML-escaped before persistence.
    pub more_info: String,
    /// Reference key of the profile picture in the binary store; empty when
    /// no picture has been uploaded.
    pub picture_key: String,
    /// Timestamp of the last persisted mutation.
    pub modified_at: DateTime<Utc>,
}

impl Profile {
    /// Build the default-valued profile for a fresh identifier.
    ///
    /// Every text field starts empty, the gender starts as
    /// [`Gender::Other`], and `modified_at` is set to the creation time.
    #[must_use]
    pub fn with_defaults(google_id: GoogleId) -> Self {
        Self {
            google_id,
            short_name: String::new(),
            email: String::new(),
            institute: String::new(),
            nationality: String::new(),
            gender: Gender::Other,
            more_info: String::new(),
            picture_key: String::new(),
            modified_at: Utc::now(),
        }
    }

    /// Compare against `other` ignoring the modification timestamp.
    ///
    /// Used to detect no-op updates, which must not bump `modified_at`.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        let mut normalised = other.clone();
        normalised.modified_at = self.modified_at;
        *self == normalised
    }
}

/// Fields to change on a profile; `None` leaves the stored value untouched.
///
/// Mirrors the partial-update shape of the HTTP request body so handlers can
/// forward it without inventing sentinel values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// Replacement short name.
    pub short_name: Option<String>,
    /// Replacement email.
    pub email: Option<String>,
    /// Replacement institute.
    pub institute: Option<String>,
    /// Replacement nationality.
    pub nationality: Option<String>,
    /// Replacement gender.
    pub gender: Option<Gender>,
    /// Replacement bio.
    pub more_info: Option<String>,
    /// Replacement picture reference key.
    pub picture_key: Option<String>,
}

impl ProfileUpdate {
    /// Apply the populated fields to `profile`, leaving the rest alone.
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(short_name) = &self.short_name {
            profile.short_name = short_name.clone();
        }
        if let Some(email) = &self.email {
            profile.email = email.clone();
        }
        if let Some(institute) = &self.institute {
            profile.institute = institute.clone();
        }
        if let Some(nationality) = &self.nationality {
            profile.nationality = nationality.clone();
        }
        if let Some(gender) = self.gender {
            profile.gender = gender;
        }
        if let Some(more_info) = &self.more_info {
            profile.more_info = more_info.clone();
        }
        if let Some(picture_key) = &self.picture_key {
            profile.picture_key = picture_key.clone();
        }
    }
}
