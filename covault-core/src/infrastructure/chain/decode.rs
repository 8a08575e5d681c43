//! Typed interpretation of parsed account data. Discovery composes
//! "attempt decode, get `Option<Vault>`" with a membership filter instead
//! of driving control flow through caught exceptions.

use crate::domain::permission::{Capabilities, Member};
use crate::domain::proposal::{Proposal, ProposalStatus};
use crate::domain::Vault;
use crate::foundation::{Address, Result, WalletError};
use crate::infrastructure::chain::AccountInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Wire shape of a multisig account as the SDK parses it.
#[derive(Debug, Deserialize, Serialize)]
pub struct RawVaultAccount {
    pub create_key: Address,
    pub threshold: u16,
    pub members: Vec<RawMember>,
    pub transaction_index: u64,
    #[serde(default)]
    pub stale_transaction_index: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RawMember {
    pub address: Address,
    /// Program bitmask: 1 = propose, 2 = vote, 4 = execute.
    pub permissions: u8,
}

/// Wire shape of a proposal account.
#[derive(Debug, Deserialize, Serialize)]
pub struct RawProposalAccount {
    pub transaction_index: u64,
    pub status: String,
    #[serde(default)]
    pub approved: Vec<Address>,
    #[serde(default)]
    pub rejected: Vec<Address>,
}

/// Attempt to read an account as a vault. `None` means "not a vault we
/// understand" — the discovery scan skips it and moves on.
pub fn decode_vault(account: &AccountInfo) -> Option<Vault> {
    let raw: RawVaultAccount = serde_json::from_value(account.data.clone()).ok()?;
    Some(Vault {
        address: account.address,
        create_key: raw.create_key,
        threshold: raw.threshold,
        members: raw.members.into_iter().map(|m| Member::new(m.address, Capabilities::from_mask(m.permissions))).collect(),
        transaction_index: raw.transaction_index,
        stale_transaction_index: raw.stale_transaction_index,
    })
}

/// Proposal accounts belong to a vault we already trust, so a shape or
/// status-tag failure here is an integrity error, not something to skip.
pub fn decode_proposal(account: &AccountInfo) -> Result<Proposal> {
    let raw: RawProposalAccount = serde_json::from_value(account.data.clone())
        .map_err(|e| WalletError::SerializationError { format: "proposal account".to_string(), details: e.to_string() })?;
    let status = ProposalStatus::classify(&raw.status)?;
    Ok(Proposal {
        index: raw.transaction_index,
        status,
        approvals: raw.approved.into_iter().collect::<BTreeSet<_>>(),
        rejections: raw.rejected.into_iter().collect::<BTreeSet<_>>(),
    })
}

pub fn encode_vault(vault: &Vault) -> serde_json::Value {
    let raw = RawVaultAccount {
        create_key: vault.create_key,
        threshold: vault.threshold,
        members: vault.members.iter().map(|m| RawMember { address: m.address, permissions: m.capabilities.mask() }).collect(),
        transaction_index: vault.transaction_index,
        stale_transaction_index: vault.stale_transaction_index,
    };
    serde_json::to_value(raw).unwrap_or(serde_json::Value::Null)
}

pub fn encode_proposal(proposal: &Proposal) -> serde_json::Value {
    let raw = RawProposalAccount {
        transaction_index: proposal.index,
        status: proposal.status.to_string(),
        approved: proposal.approvals.iter().copied().collect(),
        rejected: proposal.rejections.iter().copied().collect(),
    };
    serde_json::to_value(raw).unwrap_or(serde_json::Value::Null)
}
