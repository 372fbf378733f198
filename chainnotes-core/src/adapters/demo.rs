//! Demo chain - a file-backed [`MemoryChain`]
//!
//! Demo mode runs the full login/read/write flow without a network or funds.
//! The chain state is loaded from `demo_chain.json` on connect and written
//! back after every state-changing call.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use ethers::types::{Address, TxHash};

use super::memory::{ChainState, MemoryChain, MemorySigner};
use crate::domain::result::Result;
use crate::domain::{NoteReceipt, NoteRecord, UsernameHash};
use crate::ports::{ChainSigner, Connector, IdentityRegistry, NotesRegistry, UsernameRecord};

pub const DEMO_CHAIN_FILE: &str = "demo_chain.json";

/// Username registered for the generated demo wallet
pub const DEMO_USERNAME: &str = "demo";

/// Notes seeded into a fresh demo chain, oldest first
pub const DEMO_NOTES: &[&str] = &[
    "Welcome to public Notes!",
    "Notes are stored on chain and readable by anyone.",
    "Write one with `cnotes post`.",
];

/// Load demo chain state; a missing file is an empty chain
pub fn load_state(path: &Path) -> Result<ChainState> {
    if !path.exists() {
        return Ok(ChainState::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_state(path: &Path, state: &ChainState) -> Result<()> {
    let content = serde_json::to_string_pretty(state)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Fresh demo chain with `address` registered as [`DEMO_USERNAME`]
pub fn generate_demo_chain(address: Address) -> ChainState {
    let chain = MemoryChain::new();
    let hash = chain.register(address, DEMO_USERNAME);
    for text in DEMO_NOTES {
        chain.seed_note(hash, address, text);
    }
    chain.snapshot()
}

#[derive(Debug, Clone)]
pub struct DemoConnector {
    path: PathBuf,
}

impl DemoConnector {
    pub fn new(app_dir: &Path) -> Self {
        Self {
            path: app_dir.join(DEMO_CHAIN_FILE),
        }
    }
}

#[async_trait]
impl Connector for DemoConnector {
    fn network(&self) -> &str {
        "demo"
    }

    async fn connect(&self, private_key: &str) -> Result<Arc<dyn ChainSigner>> {
        let chain = MemoryChain::from_state(load_state(&self.path)?);
        let inner = MemorySigner::new(chain, private_key)?;
        Ok(Arc::new(DemoSigner {
            inner,
            path: self.path.clone(),
        }))
    }
}

struct DemoSigner {
    inner: MemorySigner,
    path: PathBuf,
}

impl DemoSigner {
    fn persist(&self) -> Result<()> {
        save_state(&self.path, &self.inner.chain().snapshot())
    }
}

impl ChainSigner for DemoSigner {
    fn address(&self) -> Address {
        self.inner.address()
    }
}

#[async_trait]
impl IdentityRegistry for DemoSigner {
    async fn username_record(&self, address: Address) -> Result<Option<UsernameRecord>> {
        self.inner.username_record(address).await
    }
}

#[async_trait]
impl NotesRegistry for DemoSigner {
    async fn get_notes(&self, username_hash: UsernameHash) -> Result<Vec<NoteRecord>> {
        self.inner.get_notes(username_hash).await
    }

    async fn create_note(&self, text: &str) -> Result<TxHash> {
        let tx_hash = self.inner.create_note(text).await?;
        self.persist()?;
        Ok(tx_hash)
    }

    async fn wait_for_confirmations(
        &self,
        tx_hash: TxHash,
        confirmations: usize,
    ) -> Result<NoteReceipt> {
        let receipt = self.inner.wait_for_confirmations(tx_hash, confirmations).await?;
        self.persist()?;
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::signers::{LocalWallet, Signer};
    use std::str::FromStr;
    use tempfile::tempdir;

    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[tokio::test]
    async fn test_writes_survive_reconnect() {
        let dir = tempdir().unwrap();
        let address = LocalWallet::from_str(KEY).unwrap().address();
        save_state(&dir.path().join(DEMO_CHAIN_FILE), &generate_demo_chain(address)).unwrap();

        let connector = DemoConnector::new(dir.path());
        let signer = connector.connect(KEY).await.unwrap();
        let tx = signer.create_note("from test").await.unwrap();
        signer.wait_for_confirmations(tx, 1).await.unwrap();

        let again = connector.connect(KEY).await.unwrap();
        let notes = again.get_notes(UsernameHash::of(DEMO_USERNAME)).await.unwrap();
        assert_eq!(notes.len(), DEMO_NOTES.len() + 1);
        assert_eq!(notes.last().unwrap().text, "from test");
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_chain() {
        let dir = tempdir().unwrap();
        let signer = DemoConnector::new(dir.path()).connect(KEY).await.unwrap();
        let address = signer.address();
        assert!(signer.username_record(address).await.unwrap().is_none());
    }
}
