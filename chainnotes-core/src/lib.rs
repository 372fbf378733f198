//! ChainNotes Core - public notes on Gnosis Chain behind a GetLogin identity
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: credentials, username hashes, notes and the write state machine
//! - **ports**: trait definitions for the chain and the credential store
//! - **services**: session binding, note exchange, the note board, demo mode and logging
//! - **adapters**: JSON-RPC via ethers, the credential file, in-memory and demo chains

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use adapters::demo::DemoConnector;
use adapters::file_store::FileCredentialStore;
use adapters::rpc::RpcConnector;
use config::Config;
use ports::Connector;
use services::NoteBoard;

pub use domain::result::Error;
pub use domain::{AccountInfo, Credentials, Note, NoteFeed, NoteReceipt, UsernameHash, WriteState};

/// Main context for ChainNotes operations
///
/// Holds the configuration and the credential store of one app directory
/// and builds the connector that matches the configured mode.
pub struct NotesContext {
    pub config: Config,
    pub app_dir: PathBuf,
    pub store: Arc<FileCredentialStore>,
}

impl NotesContext {
    pub fn new(app_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(app_dir)?;
        let config = Config::load(app_dir)?;
        Ok(Self {
            config,
            app_dir: app_dir.to_path_buf(),
            store: Arc::new(FileCredentialStore::new(app_dir)),
        })
    }

    /// Demo chain in demo mode, the configured RPC node otherwise
    pub fn connector(&self) -> Result<Arc<dyn Connector>> {
        if self.config.demo_mode {
            return Ok(Arc::new(DemoConnector::new(&self.app_dir)));
        }
        Ok(Arc::new(RpcConnector::from_config(&self.config)?))
    }

    pub fn board(&self) -> Result<NoteBoard> {
        Ok(NoteBoard::new(self.store.clone(), self.connector()?))
    }
}
