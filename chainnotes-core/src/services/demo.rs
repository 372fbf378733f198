//! Demo service - manage demo mode
//!
//! Demo mode swaps the RPC node for a local file-backed chain with a
//! generated wallet already registered as `demo`, so the whole flow can be
//! tried without a GetLogin account or funds.

use std::path::{Path, PathBuf};

use anyhow::Result;
use ethers::signers::{LocalWallet, Signer};

use crate::adapters::demo::{generate_demo_chain, save_state, DEMO_CHAIN_FILE, DEMO_USERNAME};
use crate::adapters::file_store::FileCredentialStore;
use crate::config::Config;
use crate::ports::CredentialStore;

/// Demo service for managing demo mode
pub struct DemoService {
    app_dir: PathBuf,
}

impl DemoService {
    pub fn new(app_dir: &Path) -> Self {
        Self {
            app_dir: app_dir.to_path_buf(),
        }
    }

    /// Check if demo mode is currently enabled
    pub fn is_enabled(&self) -> Result<bool> {
        let config = Config::load(&self.app_dir)?;
        Ok(config.demo_mode)
    }

    /// Enable demo mode
    ///
    /// This will:
    /// 1. Generate a fresh wallet
    /// 2. Write a new demo chain with the wallet registered as `demo`
    /// 3. Store the demo credentials
    /// 4. Enable demo mode in config
    pub fn enable(&self) -> Result<()> {
        std::fs::create_dir_all(&self.app_dir)?;
        let wallet = LocalWallet::new(&mut rand::thread_rng());
        let private_key = format!("0x{}", hex::encode(wallet.signer().to_bytes()));

        save_state(
            &self.demo_chain_path(),
            &generate_demo_chain(wallet.address()),
        )?;

        FileCredentialStore::new(&self.app_dir).save(&private_key, DEMO_USERNAME)?;

        let mut config = Config::load(&self.app_dir).unwrap_or_default();
        config.enable_demo_mode();
        config.save(&self.app_dir)?;

        Ok(())
    }

    /// Disable demo mode
    ///
    /// Clears the stored demo credentials; with `clean` the demo chain file
    /// is deleted too.
    pub fn disable(&self, clean: bool) -> Result<()> {
        let mut config = Config::load(&self.app_dir).unwrap_or_default();
        config.disable_demo_mode();
        config.save(&self.app_dir)?;

        let store = FileCredentialStore::new(&self.app_dir);
        if matches!(store.load(), Ok(creds) if creds.username == DEMO_USERNAME) {
            store.save("", "")?;
        }

        let demo_chain = self.demo_chain_path();
        if clean && demo_chain.exists() {
            std::fs::remove_file(&demo_chain)?;
        }

        Ok(())
    }

    pub fn demo_chain_path(&self) -> PathBuf {
        self.app_dir.join(DEMO_CHAIN_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_enable_and_disable() {
        let dir = tempdir().unwrap();
        let service = DemoService::new(dir.path());

        service.enable().unwrap();
        assert!(service.demo_chain_path().exists());
        let creds = FileCredentialStore::new(dir.path()).load().unwrap();
        assert_eq!(creds.username, DEMO_USERNAME);
        assert!(creds.private_key.starts_with("0x"));
        assert_eq!(creds.private_key.len(), 66);

        service.disable(true).unwrap();
        assert!(!service.demo_chain_path().exists());
        assert!(FileCredentialStore::new(dir.path()).load().is_err());
    }
}
