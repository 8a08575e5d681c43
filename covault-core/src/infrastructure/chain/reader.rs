use crate::foundation::{Address, Lamports, Result};
use async_trait::async_trait;

/// One fetched account: address, balance, and the SDK's parsed data as
/// loosely-typed JSON. Shape interpretation happens in `decode`.
#[derive(Clone, Debug)]
pub struct AccountInfo {
    pub address: Address,
    pub lamports: Lamports,
    pub data: serde_json::Value,
}

/// Read-only chain access, eventually consistent with ledger finality.
/// No retry here; transient failures surface as Availability errors and
/// retrying is the caller's decision.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn get_account_balance(&self, address: &Address) -> Result<Lamports>;

    /// Every account owned by `program_id`. The discovery scan has no
    /// index and inspects each candidate, so this is the one
    /// O(total-vault-count) call in the system.
    async fn get_program_accounts(&self, program_id: &Address) -> Result<Vec<AccountInfo>>;

    async fn get_parsed_account(&self, address: &Address) -> Result<Option<AccountInfo>>;

    /// Proposal accounts are addressed by (vault, index); the collaborator
    /// owns the derivation from index to account address.
    async fn get_proposal_account(&self, vault: &Address, index: u64) -> Result<Option<AccountInfo>>;
}
