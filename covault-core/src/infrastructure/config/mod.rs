//! Client configuration: TOML file merged with `COVAULT_`-prefixed
//! environment variables (environment wins).

use crate::foundation::{Address, Result, WalletError};
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_rpc_url() -> String {
    "https://api.devnet.solana.com".to_string()
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".covault")
}

fn default_share_base_url() -> String {
    "https://covault.app".to_string()
}

fn default_log_filters() -> String {
    "info".to_string()
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Address of the multisig program whose accounts discovery scans.
    #[serde(default)]
    pub program_id: Address,
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    /// Base URL embedded in generated share links.
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
    /// Directory for log files; console-only when unset.
    #[serde(default)]
    pub log_dir: Option<String>,
    /// Filter expression, e.g. `"info"` or `"debug,covault_core=trace"`.
    #[serde(default = "default_log_filters")]
    pub log_filters: String,
    /// JSON-lines keystore audit log; disabled when unset.
    #[serde(default)]
    pub audit_log_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            program_id: Address::default(),
            storage_dir: default_storage_dir(),
            share_base_url: default_share_base_url(),
            log_dir: None,
            log_filters: default_log_filters(),
            audit_log_path: None,
        }
    }
}

impl ClientConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("COVAULT_"));
        let config: ClientConfig = figment.extract().map_err(|e| WalletError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(WalletError::ConfigError("rpc_url must not be empty".to_string()));
        }
        if self.share_base_url.trim().is_empty() {
            return Err(WalletError::ConfigError("share_base_url must not be empty".to_string()));
        }
        if self.program_id == Address::default() {
            return Err(WalletError::ConfigError("program_id must be set".to_string()));
        }
        Ok(())
    }
}
