//! Account domain model
//!
//! An [`AccountInfo`] only exists for a private key whose address resolves,
//! on the identity contract, to the hash of the username the user supplied.

use std::fmt;
use std::sync::Arc;

use ethers::types::{Address, H256};
use ethers::utils::keccak256;
use serde::{Deserialize, Serialize};

use crate::ports::ChainSigner;

/// keccak-256 digest of a username, used on chain instead of the plain name
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsernameHash(H256);

impl UsernameHash {
    /// All-zero value the identity contract returns for "no username assigned"
    pub const SENTINEL: Self = Self(H256([0u8; 32]));

    /// Hash the UTF-8 bytes of a username
    pub fn of(username: &str) -> Self {
        Self(H256(keccak256(username.as_bytes())))
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(H256(bytes))
    }

    pub fn to_bytes(self) -> [u8; 32] {
        self.0 .0
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }
}

impl From<H256> for UsernameHash {
    fn from(value: H256) -> Self {
        Self(value)
    }
}

impl fmt::Display for UsernameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0.as_bytes()))
    }
}

impl fmt::Debug for UsernameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UsernameHash({})", self)
    }
}

/// A verified session: signer, username and the username hash both sides agree on
#[derive(Clone)]
pub struct AccountInfo {
    private_key: String,
    signer: Arc<dyn ChainSigner>,
    username: String,
    username_hash: UsernameHash,
}

impl AccountInfo {
    /// Only the session binder constructs accounts, after both hash checks pass
    pub(crate) fn new(
        private_key: String,
        signer: Arc<dyn ChainSigner>,
        username: String,
        username_hash: UsernameHash,
    ) -> Self {
        Self {
            private_key,
            signer,
            username,
            username_hash,
        }
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn signer(&self) -> &dyn ChainSigner {
        self.signer.as_ref()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn username_hash(&self) -> UsernameHash {
        self.username_hash
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

impl fmt::Debug for AccountInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountInfo")
            .field("address", &self.signer.address())
            .field("username", &self.username)
            .field("username_hash", &self.username_hash)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(UsernameHash::of("alice"), UsernameHash::of("alice"));
        assert_ne!(UsernameHash::of("alice"), UsernameHash::of("Alice"));
    }

    #[test]
    fn test_hash_matches_keccak() {
        // keccak256("") is a well-known constant
        assert_eq!(
            UsernameHash::of("").to_string(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_sentinel() {
        assert!(UsernameHash::SENTINEL.is_sentinel());
        assert!(UsernameHash::from_bytes([0u8; 32]).is_sentinel());
        assert!(!UsernameHash::of("alice").is_sentinel());
    }

    #[test]
    fn test_serializes_as_hex() {
        let hash = UsernameHash::of("alice");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", hash));
        let back: UsernameHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
