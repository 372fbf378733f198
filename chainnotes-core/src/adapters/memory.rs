//! In-memory adapters
//!
//! `MemoryCredentialStore` and `MemoryChain` stand in for the disk and the
//! RPC node. The chain keeps the same observable rules as the deployed
//! contracts: notes become visible once their transaction is confirmed, and
//! only addresses with a username may write. It also records every write
//! call and can inject failures, which the service tests rely on.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TxHash, H256};
use ethers::utils::keccak256;
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::{Credentials, NoteReceipt, NoteRecord, UsernameHash};
use crate::ports::{
    ChainSigner, Connector, CredentialStore, IdentityRegistry, NotesRegistry, UsernameRecord,
    APP_PRIVATE_KEY, APP_USERNAME,
};

// ============================================================================
// Credential store
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a credential pair
    pub fn with_credentials(private_key: &str, username: &str) -> Self {
        let store = Self::new();
        let _ = store.save(private_key, username);
        store
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, private_key: &str, username: &str) -> Result<()> {
        let mut entries = self.entries();
        entries.insert(APP_PRIVATE_KEY.to_string(), private_key.to_string());
        entries.insert(APP_USERNAME.to_string(), username.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Credentials> {
        let entries = self.entries();
        let credentials = Credentials::new(
            entries.get(APP_PRIVATE_KEY).cloned().unwrap_or_default(),
            entries.get(APP_USERNAME).cloned().unwrap_or_default(),
        );
        if !credentials.is_complete() {
            return Err(Error::StorageEmpty);
        }
        Ok(credentials)
    }
}

// ============================================================================
// Chain
// ============================================================================

/// Persistent part of the in-memory chain
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainState {
    pub block_number: u64,
    #[serde(default)]
    pub usernames: BTreeMap<Address, UsernameHash>,
    #[serde(default)]
    pub notes: BTreeMap<UsernameHash, Vec<NoteRecord>>,
    #[serde(default)]
    pub pending: BTreeMap<TxHash, PendingWrite>,
}

/// A submitted `createNote` that is not mined yet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingWrite {
    pub username_hash: UsernameHash,
    pub record: NoteRecord,
}

#[derive(Debug, Default)]
struct Faults {
    submit: Option<String>,
    confirmation: Option<String>,
    reads: Option<String>,
    notes_read: Option<String>,
    drop_next: bool,
}

#[derive(Debug, Default)]
struct Inner {
    state: ChainState,
    faults: Faults,
    write_calls: Vec<String>,
    nonce: u64,
}

/// Shared in-memory chain; clones see the same state
#[derive(Debug, Clone, Default)]
pub struct MemoryChain {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: ChainState) -> Self {
        let chain = Self::new();
        chain.lock().state = state;
        chain
    }

    /// Copy of the persistent state
    pub fn snapshot(&self) -> ChainState {
        self.lock().state.clone()
    }

    pub fn connector(&self) -> MemoryConnector {
        MemoryConnector {
            chain: self.clone(),
            network: "memory".to_string(),
        }
    }

    /// Assign `username` to `address` on the identity contract
    pub fn register(&self, address: Address, username: &str) -> UsernameHash {
        let hash = UsernameHash::of(username);
        self.assign_hash(address, hash);
        hash
    }

    /// Set the raw identity entry for `address`, sentinel included
    pub fn assign_hash(&self, address: Address, username_hash: UsernameHash) {
        self.lock().state.usernames.insert(address, username_hash);
    }

    /// Append an already-mined note
    pub fn seed_note(&self, username_hash: UsernameHash, author: Address, text: &str) {
        let mut inner = self.lock();
        inner.state.block_number += 1;
        let timestamp = Utc::now().timestamp() as u64;
        inner
            .state
            .notes
            .entry(username_hash)
            .or_default()
            .push(NoteRecord {
                author,
                timestamp,
                text: text.to_string(),
            });
    }

    /// Texts passed to `createNote`, in call order
    pub fn write_calls(&self) -> Vec<String> {
        self.lock().write_calls.clone()
    }

    /// Make the next `createNote` fail with `message`
    pub fn fail_next_submit(&self, message: &str) {
        self.lock().faults.submit = Some(message.to_string());
    }

    /// Make the next confirmation wait fail with `message`
    pub fn fail_next_confirmation(&self, message: &str) {
        self.lock().faults.confirmation = Some(message.to_string());
    }

    /// Make every read fail with `message` until cleared with `None`
    pub fn fail_reads(&self, message: Option<&str>) {
        self.lock().faults.reads = message.map(str::to_string);
    }

    /// Drop the next submitted transaction instead of mining it
    /// Fail the next `getNotes` call only; identity reads keep working
    pub fn fail_next_notes_read(&self, message: &str) {
        self.lock().faults.notes_read = Some(message.to_string());
    }

    pub fn drop_next_transaction(&self) {
        self.lock().faults.drop_next = true;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Connector for a [`MemoryChain`]
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    chain: MemoryChain,
    network: String,
}

#[async_trait]
impl Connector for MemoryConnector {
    fn network(&self) -> &str {
        &self.network
    }

    async fn connect(&self, private_key: &str) -> Result<Arc<dyn ChainSigner>> {
        Ok(Arc::new(MemorySigner::new(self.chain.clone(), private_key)?))
    }
}

/// Signer on a [`MemoryChain`]; the address is derived from the real key
#[derive(Debug, Clone)]
pub struct MemorySigner {
    chain: MemoryChain,
    address: Address,
}

impl MemorySigner {
    pub fn new(chain: MemoryChain, private_key: &str) -> Result<Self> {
        let wallet = LocalWallet::from_str(private_key.trim())
            .map_err(|e| Error::transport(format!("Invalid private key: {}", e)))?;
        Ok(Self {
            chain,
            address: wallet.address(),
        })
    }

    pub fn chain(&self) -> &MemoryChain {
        &self.chain
    }
}

impl ChainSigner for MemorySigner {
    fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl IdentityRegistry for MemorySigner {
    async fn username_record(&self, address: Address) -> Result<Option<UsernameRecord>> {
        let inner = self.chain.lock();
        if let Some(message) = &inner.faults.reads {
            return Err(Error::Transport(message.clone()));
        }
        Ok(inner
            .state
            .usernames
            .get(&address)
            .map(|hash| UsernameRecord {
                active: !hash.is_sentinel(),
                username_hash: *hash,
            }))
    }
}

#[async_trait]
impl NotesRegistry for MemorySigner {
    async fn get_notes(&self, username_hash: UsernameHash) -> Result<Vec<NoteRecord>> {
        let mut inner = self.chain.lock();
        if let Some(message) = &inner.faults.reads {
            return Err(Error::Transport(message.clone()));
        }
        if let Some(message) = inner.faults.notes_read.take() {
            return Err(Error::Transport(message));
        }
        Ok(inner
            .state
            .notes
            .get(&username_hash)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_note(&self, text: &str) -> Result<TxHash> {
        let mut inner = self.chain.lock();
        inner.write_calls.push(text.to_string());

        if let Some(message) = inner.faults.submit.take() {
            return Err(Error::Transport(message));
        }

        let username_hash = match inner.state.usernames.get(&self.address) {
            Some(hash) if !hash.is_sentinel() => *hash,
            _ => {
                return Err(Error::transport(
                    "execution reverted: sender has no username",
                ))
            }
        };

        inner.nonce += 1;
        let mut preimage = self.address.as_bytes().to_vec();
        preimage.extend_from_slice(&inner.nonce.to_be_bytes());
        preimage.extend_from_slice(text.as_bytes());
        let tx_hash = H256(keccak256(&preimage));

        let dropped = std::mem::take(&mut inner.faults.drop_next);
        if !dropped {
            inner.state.pending.insert(
                tx_hash,
                PendingWrite {
                    username_hash,
                    record: NoteRecord {
                        author: self.address,
                        timestamp: Utc::now().timestamp() as u64,
                        text: text.to_string(),
                    },
                },
            );
        }

        Ok(tx_hash)
    }

    async fn wait_for_confirmations(
        &self,
        tx_hash: TxHash,
        confirmations: usize,
    ) -> Result<NoteReceipt> {
        let mut inner = self.chain.lock();

        if let Some(message) = inner.faults.confirmation.take() {
            return Err(Error::Transport(message));
        }

        let write = inner.state.pending.remove(&tx_hash).ok_or_else(|| {
            Error::transport(format!(
                "Transaction {:?} was dropped before confirmation",
                tx_hash
            ))
        })?;

        inner.state.block_number += 1;
        let included_in = inner.state.block_number;
        inner
            .state
            .notes
            .entry(write.username_hash)
            .or_default()
            .push(write.record);
        inner.state.block_number += confirmations.saturating_sub(1) as u64;

        Ok(NoteReceipt {
            tx_hash,
            block_number: Some(included_in),
        })
    }
}
