//! Chain port - signer, identity contract and notes contract

use std::sync::Arc;

use async_trait::async_trait;
use ethers::types::{Address, TxHash};

use crate::domain::result::Result;
use crate::domain::{NoteReceipt, NoteRecord, UsernameHash};

/// Entry of the identity contract for one address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsernameRecord {
    pub active: bool,
    pub username_hash: UsernameHash,
}

/// Builds signers bound to one network
#[async_trait]
pub trait Connector: Send + Sync {
    /// Network label for logs (e.g. "gnosis", "demo")
    fn network(&self) -> &str;

    /// Create a signer for `private_key` connected to this network
    async fn connect(&self, private_key: &str) -> Result<Arc<dyn ChainSigner>>;
}

/// Read-only access to the GetLogin identity contract
#[async_trait]
pub trait IdentityRegistry: Send + Sync {
    /// Look up the username entry for `address`
    ///
    /// `None` means the contract returned no entry at all.
    async fn username_record(&self, address: Address) -> Result<Option<UsernameRecord>>;
}

/// Access to the notes contract
#[async_trait]
pub trait NotesRegistry: Send + Sync {
    /// All notes stored for a username hash, oldest first
    async fn get_notes(&self, username_hash: UsernameHash) -> Result<Vec<NoteRecord>>;

    /// Submit a `createNote` transaction and return its hash once the node accepted it
    async fn create_note(&self, text: &str) -> Result<TxHash>;

    /// Wait until the transaction has `confirmations` confirmations
    async fn wait_for_confirmations(
        &self,
        tx_hash: TxHash,
        confirmations: usize,
    ) -> Result<NoteReceipt>;
}

/// A private-key-bound handle for one address on one network
pub trait ChainSigner: IdentityRegistry + NotesRegistry {
    fn address(&self) -> Address;
}
