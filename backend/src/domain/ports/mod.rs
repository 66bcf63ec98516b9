//! Domain ports.
//!
//! Driven ports (repositories, the picture store) are implemented by
//! `outbound` adapters; driving ports (queries and commands) are implemented
//! by the domain services and consumed by inbound adapters. The managed
//! datastore behind the repositories is an external collaborator.

mod account_repository;
mod accounts_command;
mod picture_store;
mod profile_repository;
mod profiles_command;
mod profiles_query;

pub use account_repository::AccountRepository;
pub use accounts_command::{AccountsCommand, CreatedAccount, NewAccountRequest};
pub use picture_store::PictureStore;
pub use profile_repository::ProfileRepository;
pub use profiles_command::ProfilesCommand;
pub use profiles_query::ProfilesQuery;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use accounts_command::MockAccountsCommand;
#[cfg(test)]
pub use picture_store::MockPictureStore;
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
#[cfg(test)]
pub use profiles_command::MockProfilesCommand;
#[cfg(test)]
pub use profiles_query::MockProfilesQuery;

/// Errors raised by storage adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The datastore could not be reached.
    #[error("datastore connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure detail.
        message: String,
    },
    /// A query or mutation failed during execution.
    #[error("datastore query failed: {message}")]
    Query {
        /// Adapter-supplied failure detail.
        message: String,
    },
}

impl StorageError {
    /// Build a [`StorageError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`StorageError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}
