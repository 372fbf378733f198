//! Core domain entities
//!
//! Sessions, notes and the write-path state machine. These are plain data
//! structures with validation logic; all chain and disk access goes through
//! the ports.

mod account;
mod credentials;
pub mod note;
pub mod result;
pub mod write;

pub use account::{AccountInfo, UsernameHash};
pub use credentials::Credentials;
pub use note::{Note, NoteFeed, NoteReceipt, NoteRecord};
pub use write::{WriteEvent, WriteState, REQUIRED_CONFIRMATIONS};
