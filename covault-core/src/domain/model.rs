use crate::domain::permission::Member;
use crate::foundation::Address;
use serde::{Deserialize, Serialize};

/// Read-through projection of an on-chain multisig account. Never durable
/// local truth: refetched before any action that depends on its current
/// value (threshold math, transaction index, member set).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Vault {
    pub address: Address,
    pub create_key: Address,
    pub threshold: u16,
    pub members: Vec<Member>,
    /// Index of the most recently created proposal (0 when none exist).
    pub transaction_index: u64,
    /// Proposals at or below this index are considered stale by the program.
    pub stale_transaction_index: u64,
}

impl Vault {
    pub fn member(&self, address: &Address) -> Option<&Member> {
        self.members.iter().find(|m| &m.address == address)
    }

    pub fn is_member(&self, address: &Address) -> bool {
        self.member(address).is_some()
    }

    pub fn voter_count(&self) -> usize {
        self.members.iter().filter(|m| m.capabilities.vote).count()
    }
}

/// Locally persisted bookkeeping entry: one vault this owner created or
/// imported. Created only after on-chain existence and membership are
/// verified; never mutated; removed only by explicit user action, which
/// does not touch the on-chain vault.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct VaultReference {
    pub owner: Address,
    pub vault_address: Address,
    pub create_key: Address,
}
