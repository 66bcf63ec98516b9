//! Domain primitives, entities, and services.
//!
//! Purpose: Define strongly typed domain entities used by the HTTP and
//! persistence layers. Keep types transport agnostic and document invariants
//! in each type's Rustdoc.
//!
//! Public surface:
//! - `Error` / `ErrorCode` — categorised domain failure carried to adapters.
//! - `Account`, `Profile`, `Gender`, `GoogleId` — persistence-shaped entities.
//! - `AccountsService`, `ProfilesService` — implementations of the driving
//!   ports in [`ports`].

pub mod account;
pub mod accounts_service;
pub mod app_url;
pub mod demo_course;
pub mod error;
pub mod ports;
pub mod profile;
pub mod profiles_service;
pub mod sanitize;
pub mod validation;

pub use self::account::Account;
pub use self::accounts_service::AccountsService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::profile::{Gender, GoogleId, Profile, ProfileUpdate, ProfileValidationError};
pub use self::profiles_service::ProfilesService;
