//! Credential store port - local persistence of the login pair

use crate::domain::result::Result;
use crate::domain::Credentials;

/// Storage key of the private key entry
pub const APP_PRIVATE_KEY: &str = "app_private_key";

/// Storage key of the username entry
pub const APP_USERNAME: &str = "app_username";

/// Key/value persistence for the private key and username.
///
/// The two values are kept as independent string entries. Saving empty
/// strings is how a logout clears them.
pub trait CredentialStore: Send + Sync {
    /// Persist both entries
    fn save(&self, private_key: &str, username: &str) -> Result<()>;

    /// Load both entries
    ///
    /// Fails with `Error::StorageEmpty` when either entry is absent or empty.
    fn load(&self) -> Result<Credentials>;
}
