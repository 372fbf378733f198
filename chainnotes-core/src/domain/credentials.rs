//! Credentials domain model

use std::fmt;

use serde::{Deserialize, Serialize};

/// A private key and the GetLogin username it was issued for.
///
/// Both halves must be non-empty, otherwise the pair counts as absent.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub private_key: String,
    pub username: String,
}

impl Credentials {
    pub fn new(private_key: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
            username: username.into(),
        }
    }

    /// True when both the private key and the username are present
    pub fn is_complete(&self) -> bool {
        !self.private_key.is_empty() && !self.username.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("private_key", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness() {
        assert!(Credentials::new("0xabc", "alice").is_complete());
        assert!(!Credentials::new("", "alice").is_complete());
        assert!(!Credentials::new("0xabc", "").is_complete());
    }

    #[test]
    fn test_debug_hides_private_key() {
        let creds = Credentials::new("0xdeadbeef", "alice");
        let shown = format!("{:?}", creds);
        assert!(!shown.contains("deadbeef"));
        assert!(shown.contains("alice"));
    }
}
