//! Configuration management
//!
//! Settings live in `settings.json` inside the app directory:
//! ```json
//! {
//!   "network": {
//!     "rpcUrl": "https://xdai.fairdatasociety.org",
//!     "notesAddress": "0xf6b270136Da7F8a2113B93a3b9Eeaf5160C45bA0",
//!     "identityAddress": "0x..."
//!   },
//!   "app": { "demoMode": false }
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use ethers::types::Address;
use serde::{Deserialize, Serialize};

use crate::domain::result::Error;

/// Public Gnosis Chain (xDai) RPC endpoint
pub const DEFAULT_RPC_URL: &str = "https://xdai.fairdatasociety.org";

/// Notes contract on Gnosis Chain
pub const DEFAULT_NOTES_ADDRESS: &str = "0xf6b270136Da7F8a2113B93a3b9Eeaf5160C45bA0";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    network: NetworkSettings,
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rpc_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identity_address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Chainnotes configuration (resolved view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub notes_address: String,
    pub identity_address: Option<String>,
    pub demo_mode: bool,
    pub(crate) from_env: EnvSourced,
}

/// Fields whose value came from an environment override
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct EnvSourced {
    rpc_url: bool,
    identity_address: bool,
    demo_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            notes_address: DEFAULT_NOTES_ADDRESS.to_string(),
            identity_address: None,
            demo_mode: false,
            from_env: EnvSourced::default(),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load config from the app directory
    ///
    /// Environment overrides (for CI/testing):
    /// - `CHAINNOTES_RPC_URL`
    /// - `CHAINNOTES_IDENTITY_ADDRESS`
    /// - `CHAINNOTES_DEMO_MODE`
    pub fn load(app_dir: &Path) -> Result<Self> {
        let raw = read_settings(app_dir)?;
        let defaults = Config::default();
        let mut from_env = EnvSourced::default();

        let rpc_url = match env_var("CHAINNOTES_RPC_URL") {
            Some(url) => {
                from_env.rpc_url = true;
                url
            }
            None => raw.network.rpc_url.unwrap_or(defaults.rpc_url),
        };

        let identity_address = match env_var("CHAINNOTES_IDENTITY_ADDRESS") {
            Some(address) => {
                from_env.identity_address = true;
                Some(address)
            }
            None => raw.network.identity_address,
        };

        let demo_mode = match env_var("CHAINNOTES_DEMO_MODE").as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => {
                from_env.demo_mode = true;
                true
            }
            Some("false" | "0" | "no" | "FALSE" | "NO") => {
                from_env.demo_mode = true;
                false
            }
            _ => raw.app.demo_mode,
        };

        Ok(Self {
            rpc_url,
            notes_address: raw.network.notes_address.unwrap_or(defaults.notes_address),
            identity_address,
            demo_mode,
            from_env,
        })
    }

    /// Save config to the app directory, preserving unmanaged settings
    ///
    /// Values that came from environment overrides are not written; the
    /// file keeps what it had for those fields.
    pub fn save(&self, app_dir: &Path) -> Result<()> {
        let settings_path = app_dir.join("settings.json");
        let mut settings = read_settings(app_dir)?;

        if !self.from_env.rpc_url {
            settings.network.rpc_url = Some(self.rpc_url.clone());
        }
        settings.network.notes_address = Some(self.notes_address.clone());
        if !self.from_env.identity_address {
            settings.network.identity_address = self.identity_address.clone();
        }
        if !self.from_env.demo_mode {
            settings.app.demo_mode = self.demo_mode;
        }

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Enable demo mode
    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
        self.from_env.demo_mode = false;
    }

    /// Disable demo mode
    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
        self.from_env.demo_mode = false;
    }

    /// Parsed notes contract address
    pub fn notes_contract(&self) -> std::result::Result<Address, Error> {
        parse_address("notesAddress", &self.notes_address)
    }

    /// Parsed identity contract address; required outside demo mode
    pub fn identity_contract(&self) -> std::result::Result<Address, Error> {
        let raw = self.identity_address.as_deref().ok_or_else(|| {
            Error::config(
                "identity contract address is not set (settings.json network.identityAddress \
                 or CHAINNOTES_IDENTITY_ADDRESS)",
            )
        })?;
        parse_address("identityAddress", raw)
    }
}

fn read_settings(app_dir: &Path) -> Result<SettingsFile> {
    let settings_path = app_dir.join("settings.json");
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

fn parse_address(field: &str, raw: &str) -> std::result::Result<Address, Error> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| Error::config(format!("invalid {}: {} ({})", field, raw, e)))
}

/// Serializes tests that touch `CHAINNOTES_*` variables
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Run `f` with the `CHAINNOTES_*` overrides set as given and the rest cleared
#[cfg(test)]
pub(crate) fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
    const NAMES: [&str; 3] = [
        "CHAINNOTES_RPC_URL",
        "CHAINNOTES_IDENTITY_ADDRESS",
        "CHAINNOTES_DEMO_MODE",
    ];
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    for name in NAMES {
        std::env::remove_var(name);
    }
    for (name, value) in vars {
        std::env::set_var(name, value);
    }
    let result = f();
    for name in NAMES {
        std::env::remove_var(name);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_env_overrides_are_applied() {
        let dir = tempdir().unwrap();
        let config = with_env(
            &[
                ("CHAINNOTES_RPC_URL", "http://127.0.0.1:8545"),
                ("CHAINNOTES_DEMO_MODE", "1"),
            ],
            || Config::load(dir.path()).unwrap(),
        );
        assert_eq!(config.rpc_url, "http://127.0.0.1:8545");
        assert!(config.demo_mode);
    }

    #[test]
    fn test_save_does_not_persist_env_overrides() {
        let dir = tempdir().unwrap();
        with_env(
            &[
                ("CHAINNOTES_RPC_URL", "http://127.0.0.1:9999"),
                (
                    "CHAINNOTES_IDENTITY_ADDRESS",
                    "0x00000000000000000000000000000000000000bb",
                ),
            ],
            || {
                let mut config = Config::load(dir.path()).unwrap();
                config.enable_demo_mode();
                config.save(dir.path()).unwrap();
            },
        );

        let reloaded = with_env(&[], || Config::load(dir.path()).unwrap());
        assert_eq!(reloaded.rpc_url, DEFAULT_RPC_URL);
        assert!(reloaded.identity_address.is_none());
        assert!(reloaded.demo_mode);
    }

    #[test]
    fn test_env_demo_mode_is_kept_out_of_file() {
        let dir = tempdir().unwrap();
        with_env(&[("CHAINNOTES_DEMO_MODE", "true")], || {
            Config::load(dir.path()).unwrap().save(dir.path()).unwrap();
        });
        assert!(!with_env(&[], || Config::load(dir.path()).unwrap()).demo_mode);
    }

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let config = with_env(&[], || Config::load(dir.path()).unwrap());
        assert_eq!(config.notes_address, DEFAULT_NOTES_ADDRESS);
        assert!(config.notes_contract().is_ok());
    }

    #[test]
    fn test_missing_identity_address_is_a_config_error() {
        let config = Config {
            identity_address: None,
            ..Config::default()
        };
        assert!(matches!(config.identity_contract(), Err(Error::Config(_))));
    }

    #[test]
    fn test_save_preserves_unmanaged_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app": {"demoMode": false, "theme": "dark"}, "extra": 7}"#,
        )
        .unwrap();

        with_env(&[], || {
            let mut config = Config::load(dir.path()).unwrap();
            config.identity_address =
                Some("0x00000000000000000000000000000000000000aa".to_string());
            config.save(dir.path()).unwrap();
        });

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["app"]["theme"], "dark");
        assert_eq!(value["extra"], 7);
        assert_eq!(
            value["network"]["identityAddress"],
            "0x00000000000000000000000000000000000000aa"
        );
    }

    #[test]
    fn test_invalid_address_is_rejected() {
        let config = Config {
            notes_address: "not-an-address".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.notes_contract(), Err(Error::Config(_))));
    }
}
