//! Account entity.

use chrono::{DateTime, Utc};

use crate::domain::profile::GoogleId;

/// Account record owning at most one student profile.
///
/// ## Invariants
/// - `google_id` is unique across accounts and shared with the profile.
/// - `created_at` is set once at creation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Identifier issued by the identity provider.
    pub google_id: GoogleId,
    /// Full name of the account holder.
    pub name: String,
    /// Contact email of the account holder.
    pub email: String,
    /// Institute the account holder belongs to.
    pub institute: String,
    /// Whether the holder registered as an instructor.
    pub is_instructor: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a new account stamped with the current time.
    #[must_use]
    pub fn new(
        google_id: GoogleId,
        name: impl Into<String>,
        email: impl Into<String>,
        institute: impl Into<String>,
        is_instructor: bool,
    ) -> Self {
        Self {
            google_id,
            name: name.into(),
            email: email.into(),
            institute: institute.into(),
            is_instructor,
            created_at: Utc::now(),
        }
    }
}
