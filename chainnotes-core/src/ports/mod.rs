//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Services depend
//! only on these traits; adapters supply JSON-RPC, file and in-memory
//! implementations.

mod chain;
mod credential_store;

pub use chain::{ChainSigner, Connector, IdentityRegistry, NotesRegistry, UsernameRecord};
pub use credential_store::{CredentialStore, APP_PRIVATE_KEY, APP_USERNAME};
