//! Shared application state handed to HTTP handlers.

use std::sync::Arc;

use crate::domain::ports::{AccountsCommand, ProfilesCommand, ProfilesQuery};

/// Driving ports and flags the HTTP handlers need.
#[derive(Clone)]
pub struct HttpState {
    accounts: Arc<dyn AccountsCommand>,
    profiles_query: Arc<dyn ProfilesQuery>,
    profiles_command: Arc<dyn ProfilesCommand>,
    dev_mode: bool,
}

impl HttpState {
    /// Bundle the driving ports for handler consumption.
    ///
    /// `dev_mode` unlocks the diagnostic endpoints that must never be open
    /// in production.
    #[must_use]
    pub fn new(
        accounts: Arc<dyn AccountsCommand>,
        profiles_query: Arc<dyn ProfilesQuery>,
        profiles_command: Arc<dyn ProfilesCommand>,
        dev_mode: bool,
    ) -> Self {
        Self {
            accounts,
            profiles_query,
            profiles_command,
            dev_mode,
        }
    }

    /// Account lifecycle port.
    #[must_use]
    pub fn accounts(&self) -> &dyn AccountsCommand {
        self.accounts.as_ref()
    }

    /// Profile read port.
    #[must_use]
    pub fn profiles_query(&self) -> &dyn ProfilesQuery {
        self.profiles_query.as_ref()
    }

    /// Profile write port.
    #[must_use]
    pub fn profiles_command(&self) -> &dyn ProfilesCommand {
        self.profiles_command.as_ref()
    }

    /// Whether the server runs in dev mode.
    #[must_use]
    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }
}
