#![allow(dead_code)]

use covault_core::application::{VaultRegistry, VaultService};
use covault_core::domain::permission::{Capabilities, Member};
use covault_core::domain::Vault;
use covault_core::foundation::Address;
use covault_core::infrastructure::chain::{ChainReader, ChainWriter, MockChain};
use covault_core::infrastructure::keystore::{KdfParams, Keystore};
use covault_core::infrastructure::storage::MemoryBackend;
use std::sync::Arc;

pub fn addr(seed: u8) -> Address {
    Address::new([seed; 32])
}

/// Quick Argon2 parameters so suites stay fast; production uses defaults.
pub fn fast_kdf() -> KdfParams {
    KdfParams { m_cost: 1024, t_cost: 1, p_cost: 1 }
}

pub fn member(address: Address, capabilities: Capabilities) -> Member {
    Member::new(address, capabilities)
}

pub struct VaultBuilder {
    vault: Vault,
}

impl Default for VaultBuilder {
    fn default() -> Self {
        Self {
            vault: Vault {
                address: addr(100),
                create_key: addr(101),
                threshold: 1,
                members: Vec::new(),
                transaction_index: 0,
                stale_transaction_index: 0,
            },
        }
    }
}

impl VaultBuilder {
    pub fn address(mut self, address: Address) -> Self {
        self.vault.address = address;
        self
    }

    pub fn threshold(mut self, threshold: u16) -> Self {
        self.vault.threshold = threshold;
        self
    }

    pub fn member(mut self, address: Address, capabilities: Capabilities) -> Self {
        self.vault.members.push(Member::new(address, capabilities));
        self
    }

    pub fn transaction_index(mut self, index: u64) -> Self {
        self.vault.transaction_index = index;
        self
    }

    pub fn build(self) -> Vault {
        self.vault
    }
}

/// One participant: an unlocked-capable keystore plus a service wired to
/// the shared mock chain. Returns the participant's public address.
pub async fn participant(chain: &Arc<MockChain>, password: &str) -> (VaultService, Address) {
    let backend = Arc::new(MemoryBackend::new());
    let keystore = Keystore::new(backend.clone()).with_kdf_params(fast_kdf());
    let address = keystore.create(password, "test participant").await.expect("create identity");
    let registry = VaultRegistry::new(backend, chain.program_id());
    let reader: Arc<dyn ChainReader> = chain.clone();
    let writer: Arc<dyn ChainWriter> = chain.clone();
    (VaultService::new(keystore, registry, reader, writer), address)
}
