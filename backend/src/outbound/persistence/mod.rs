//! Persistence adapters.
//!
//! The managed datastore is an external collaborator; the in-memory adapters
//! here stand in for it during local runs and back the tests.

mod memory;

pub use memory::{MemoryAccountRepository, MemoryPictureStore, MemoryProfileRepository};
