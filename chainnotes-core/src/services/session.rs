//! Session service - bind a private key and username to a verified account

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{AccountInfo, Credentials, UsernameHash};
use crate::ports::{ChainSigner, Connector};

/// Session binder
///
/// Builds a signer for the private key, asks the identity contract which
/// username hash belongs to the signer's address and accepts the pair only
/// if it equals the hash of the supplied username. Read-only; nothing is
/// retried.
#[derive(Clone)]
pub struct SessionService {
    connector: Arc<dyn Connector>,
}

impl SessionService {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    /// Network the sessions are bound to
    pub fn network(&self) -> &str {
        self.connector.network()
    }

    pub async fn bind(&self, private_key: &str, username: &str) -> Result<AccountInfo> {
        let signer = self.connector.connect(private_key).await?;
        let address = signer.address();

        let record = signer
            .username_record(address)
            .await?
            .ok_or(Error::UserNotFound)?;

        if record.username_hash.is_sentinel() {
            return Err(Error::UserNotAssigned { address });
        }

        if UsernameHash::of(username) != record.username_hash {
            return Err(Error::UsernameMismatch);
        }

        Ok(AccountInfo::new(
            private_key.to_string(),
            signer,
            username.to_string(),
            record.username_hash,
        ))
    }

    pub async fn bind_credentials(&self, credentials: &Credentials) -> Result<AccountInfo> {
        self.bind(&credentials.private_key, &credentials.username).await
    }
}
