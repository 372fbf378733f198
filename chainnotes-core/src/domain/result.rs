//! Result and error types for the core library

use ethers::types::Address;
use thiserror::Error;

/// Longest error message shown to the user
pub const MAX_MESSAGE_LEN: usize = 255;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    /// No saved credentials. Front ends treat this as "not logged in".
    #[error("Local saved privateKey or username is empty")]
    StorageEmpty,

    #[error("User not found in GetLogin contract by session address")]
    UserNotFound,

    #[error("User assigned to the address {address:?} not found")]
    UserNotAssigned { address: Address },

    #[error("The hash of the received username does not match the hash from the GetLogin smart contract")]
    UsernameMismatch,

    /// Any failure reported by the RPC node or a contract call
    #[error("{0}")]
    Transport(String),

    #[error("Note text is empty")]
    ValidationEmpty,

    #[error("Application session is not created for notes retrieving")]
    NoSession,

    #[error("Invalid write transition: {0}")]
    InvalidTransition(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a transport error from any displayable failure
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Message for display, bounded to [`MAX_MESSAGE_LEN`] characters
    pub fn display_message(&self) -> String {
        truncate_message(&self.to_string())
    }

    /// Whether this error means the session could not be verified on chain
    pub fn is_binding_failure(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound | Self::UserNotAssigned { .. } | Self::UsernameMismatch
        )
    }
}

/// Cut a message down to [`MAX_MESSAGE_LEN`] characters
pub fn truncate_message(msg: &str) -> String {
    msg.chars().take(MAX_MESSAGE_LEN).collect()
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_message_is_bounded() {
        let err = Error::Transport("x".repeat(1000));
        assert_eq!(err.display_message().chars().count(), MAX_MESSAGE_LEN);

        let short = Error::Transport("connection refused".to_string());
        assert_eq!(short.display_message(), "connection refused");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let msg = "é".repeat(300);
        let truncated = truncate_message(&msg);
        assert_eq!(truncated.chars().count(), MAX_MESSAGE_LEN);
    }

    #[test]
    fn test_user_not_assigned_names_address() {
        let address: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
        let msg = Error::UserNotAssigned { address }.to_string();
        assert!(msg.contains("0x00000000000000000000000000000000000000aa"));
    }

    #[test]
    fn test_binding_failures() {
        assert!(Error::UserNotFound.is_binding_failure());
        assert!(Error::UsernameMismatch.is_binding_failure());
        assert!(!Error::StorageEmpty.is_binding_failure());
        assert!(!Error::transport("timeout").is_binding_failure());
    }
}
