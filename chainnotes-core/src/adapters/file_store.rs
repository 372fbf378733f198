//! JSON file credential store
//!
//! Keeps the two entries in `credentials.json` in the app directory:
//! ```json
//! { "app_private_key": "0x...", "app_username": "alice" }
//! ```

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

use crate::domain::result::{Error, Result};
use crate::domain::Credentials;
use crate::ports::{CredentialStore, APP_PRIVATE_KEY, APP_USERNAME};

pub const CREDENTIALS_FILE: &str = "credentials.json";

#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store inside `app_dir`
    pub fn new(app_dir: &Path) -> Self {
        Self {
            path: app_dir.join(CREDENTIALS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(entries)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path)?;
        // mode() only applies on create; tighten a pre-existing file too
        #[cfg(unix)]
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, private_key: &str, username: &str) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(APP_PRIVATE_KEY.to_string(), private_key.to_string());
        entries.insert(APP_USERNAME.to_string(), username.to_string());
        self.write_entries(&entries)
    }

    fn load(&self) -> Result<Credentials> {
        let entries = self.read_entries()?;
        let private_key = entries.get(APP_PRIVATE_KEY).cloned().unwrap_or_default();
        let username = entries.get(APP_USERNAME).cloned().unwrap_or_default();

        let credentials = Credentials::new(private_key, username);
        if !credentials.is_complete() {
            return Err(Error::StorageEmpty);
        }
        Ok(credentials)
    }
}
