//! Driving port for the account lifecycle.

use async_trait::async_trait;

use crate::domain::account::Account;
use crate::domain::error::Error;
use crate::domain::profile::GoogleId;

/// Validated-at-the-boundary request to create an instructor account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccountRequest {
    /// Full name of the instructor.
    pub instructor_name: String,
    /// Contact email of the instructor.
    pub instructor_email: String,
    /// Institute the instructor belongs to.
    pub institute: String,
}

/// Outcome of a successful account creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAccount {
    /// The persisted account record.
    pub account: Account,
    /// Identifier of the instructor's demo course.
    pub demo_course_id: String,
    /// Absolute or relative join link to hand to the instructor.
    pub join_link: String,
}

/// Command side of the account lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Create an instructor account and derive its demo course id and join
    /// link.
    async fn create_account(&self, request: NewAccountRequest) -> Result<CreatedAccount, Error>;

    /// Delete the account and cascade to its profile.
    ///
    /// Fails silently when no account exists.
    async fn delete_account(&self, google_id: &GoogleId) -> Result<(), Error>;
}
