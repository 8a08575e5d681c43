//! Per-owner bookkeeping of known vaults, plus membership-filtered
//! discovery against the program's full account set.

use crate::domain::{share_link, Vault, VaultReference};
use crate::foundation::{Address, Result, WalletError};
use crate::infrastructure::chain::decode::decode_vault;
use crate::infrastructure::chain::ChainReader;
use crate::infrastructure::storage::StorageBackend;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct VaultRegistry {
    backend: Arc<dyn StorageBackend>,
    program_id: Address,
    // Serializes whole-list read-modify-write within this process; writers
    // in other processes are last-writer-wins.
    write_lock: Mutex<()>,
}

fn owner_key(owner: &Address) -> String {
    format!("vaults.{owner}")
}

impl VaultRegistry {
    pub fn new(backend: Arc<dyn StorageBackend>, program_id: Address) -> Self {
        Self { backend, program_id, write_lock: Mutex::new(()) }
    }

    /// Idempotent: re-registering a known vault is a no-op. Returns whether
    /// a new entry was added.
    pub async fn register(&self, owner: &Address, vault_address: &Address, create_key: &Address) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut references = self.load_list(owner).await?;
        if references.iter().any(|r| &r.vault_address == vault_address) {
            return Ok(false);
        }
        references.push(VaultReference { owner: *owner, vault_address: *vault_address, create_key: *create_key });
        self.store_list(owner, &references).await?;
        log::info!("registered vault owner={owner} vault={vault_address}");
        Ok(true)
    }

    pub async fn list(&self, owner: &Address) -> Result<Vec<VaultReference>> {
        self.load_list(owner).await
    }

    /// Local bookkeeping only; the on-chain vault is untouched. Returns
    /// whether an entry was removed.
    pub async fn remove(&self, owner: &Address, vault_address: &Address) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut references = self.load_list(owner).await?;
        let before = references.len();
        references.retain(|r| &r.vault_address != vault_address);
        if references.len() == before {
            return Ok(false);
        }
        self.store_list(owner, &references).await?;
        log::info!("removed vault from local list owner={owner} vault={vault_address}");
        Ok(true)
    }

    /// Full scan of the program's accounts filtered to vaults that list
    /// `owner` as a member. Accounts that do not decode as vaults are
    /// skipped, never fatal.
    pub async fn discover(&self, owner: &Address, reader: &dyn ChainReader) -> Result<Vec<Vault>> {
        let accounts = reader.get_program_accounts(&self.program_id).await?;
        let scanned = accounts.len();
        let vaults: Vec<Vault> =
            accounts.iter().filter_map(decode_vault).filter(|vault| vault.is_member(owner)).collect();
        log::debug!("discovery scan owner={owner} scanned={scanned} member_of={}", vaults.len());
        Ok(vaults)
    }

    /// Accepts a raw base58 vault address or a share URL. Verifies on-chain
    /// existence and membership before registering.
    pub async fn import(&self, owner: &Address, input: &str, reader: &dyn ChainReader) -> Result<Vault> {
        let vault_address = share_link::parse_address_or_link(input)?;
        let account = reader
            .get_parsed_account(&vault_address)
            .await?
            .ok_or_else(|| WalletError::VaultNotFound(vault_address.to_string()))?;
        let vault = decode_vault(&account).ok_or_else(|| WalletError::VaultNotFound(vault_address.to_string()))?;
        if !vault.is_member(owner) {
            return Err(WalletError::NotAMember { vault: vault_address.to_string(), member: owner.to_string() });
        }
        self.register(owner, &vault_address, &vault.create_key).await?;
        Ok(vault)
    }

    async fn load_list(&self, owner: &Address) -> Result<Vec<VaultReference>> {
        match self.backend.get(&owner_key(owner)).await? {
            None => Ok(Vec::new()),
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
        }
    }

    async fn store_list(&self, owner: &Address, references: &[VaultReference]) -> Result<()> {
        self.backend.set(&owner_key(owner), serde_json::to_vec(references)?).await
    }
}
