//! In-memory ledger implementing both chain traits. Mirrors the program's
//! authoritative rules (membership, capability checks, threshold flip,
//! vote exclusivity) so integration tests and devnet runs exercise the
//! full submit/confirm path.

use crate::domain::proposal::{Proposal, ProposalStatus, VoteKind};
use crate::domain::Vault;
use crate::foundation::{Address, Lamports, Result, TxSignature, WalletError};
use crate::infrastructure::chain::decode::{encode_proposal, encode_vault};
use crate::infrastructure::chain::{AccountInfo, ChainReader, ChainWriter, Confirmation, TransactionIntent};
use crate::infrastructure::keystore::UnlockedIdentity;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

struct VaultEntry {
    vault: Vault,
    proposals: BTreeMap<u64, Proposal>,
    transfers: HashMap<u64, (Address, Lamports)>,
}

struct Ledger {
    balances: HashMap<Address, Lamports>,
    vaults: HashMap<Address, VaultEntry>,
    junk_accounts: Vec<AccountInfo>,
    next_signature: u64,
    fail_next_confirmation: bool,
}

pub struct MockChain {
    program_id: Address,
    inner: Mutex<Ledger>,
}

impl MockChain {
    pub fn new(program_id: Address) -> Self {
        Self {
            program_id,
            inner: Mutex::new(Ledger {
                balances: HashMap::new(),
                vaults: HashMap::new(),
                junk_accounts: Vec::new(),
                next_signature: 1,
                fail_next_confirmation: false,
            }),
        }
    }

    pub fn program_id(&self) -> Address {
        self.program_id
    }

    /// Seed a vault account directly (as if created out-of-band).
    pub fn add_vault(&self, vault: Vault) {
        let mut ledger = self.lock();
        ledger.vaults.insert(vault.address, VaultEntry { vault, proposals: BTreeMap::new(), transfers: HashMap::new() });
    }

    /// Seed a program-owned account that is not a vault, for exercising
    /// the skip path in discovery.
    pub fn add_junk_account(&self, address: Address, data: serde_json::Value) {
        self.lock().junk_accounts.push(AccountInfo { address, lamports: 0, data });
    }

    pub fn set_balance(&self, address: Address, lamports: Lamports) {
        self.lock().balances.insert(address, lamports);
    }

    /// The next `confirm` call reports `Failed`, exercising the
    /// confirmation-is-completion contract.
    pub fn fail_next_confirmation(&self) {
        self.lock().fail_next_confirmation = true;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Ledger> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn proposal_account_address(vault: &Address, index: u64) -> Address {
        let mut bytes = *vault.as_bytes();
        bytes[24..32].copy_from_slice(&index.to_le_bytes());
        Address::new(bytes)
    }

    fn member_of<'a>(entry: &'a VaultEntry, signer: &Address) -> Result<&'a crate::domain::Member> {
        entry
            .vault
            .member(signer)
            .ok_or_else(|| WalletError::NotAMember { vault: entry.vault.address.to_string(), member: signer.to_string() })
    }

    fn apply(&self, intent: &TransactionIntent, signer: &Address) -> Result<()> {
        let mut ledger = self.lock();
        match intent {
            TransactionIntent::CreateVault { vault_address, create_key, threshold, members } => {
                if ledger.vaults.contains_key(vault_address) {
                    return Err(WalletError::Message(format!("vault already exists: {vault_address}")));
                }
                let vault = Vault {
                    address: *vault_address,
                    create_key: *create_key,
                    threshold: *threshold,
                    members: members.clone(),
                    transaction_index: 0,
                    stale_transaction_index: 0,
                };
                ledger.vaults.insert(*vault_address, VaultEntry { vault, proposals: BTreeMap::new(), transfers: HashMap::new() });
                Ok(())
            }
            TransactionIntent::Propose { vault_address, recipient, lamports } => {
                let entry = Self::entry_mut(&mut ledger, vault_address)?;
                if !Self::member_of(entry, signer)?.can_propose() {
                    return Err(WalletError::permission_denied(signer.to_string(), "propose"));
                }
                entry.vault.transaction_index += 1;
                let index = entry.vault.transaction_index;
                entry.proposals.insert(index, Proposal::new(index, ProposalStatus::Active));
                entry.transfers.insert(index, (*recipient, *lamports));
                Ok(())
            }
            TransactionIntent::Approve { vault_address, proposal_index } => {
                Self::vote(&mut ledger, vault_address, *proposal_index, signer, VoteKind::Approve)
            }
            TransactionIntent::Reject { vault_address, proposal_index } => {
                Self::vote(&mut ledger, vault_address, *proposal_index, signer, VoteKind::Reject)
            }
            TransactionIntent::Execute { vault_address, proposal_index } => {
                let transfer = {
                    let entry = Self::entry_mut(&mut ledger, vault_address)?;
                    if !Self::member_of(entry, signer)?.can_execute() {
                        return Err(WalletError::permission_denied(signer.to_string(), "execute"));
                    }
                    let proposal = entry.proposals.get_mut(proposal_index).ok_or(WalletError::ProposalNotFound {
                        vault: vault_address.to_string(),
                        index: *proposal_index,
                    })?;
                    if proposal.status != ProposalStatus::Approved {
                        return Err(WalletError::ProposalNotActionable {
                            index: *proposal_index,
                            current: proposal.status.to_string(),
                            required: ProposalStatus::Approved.to_string(),
                        });
                    }
                    proposal.status = ProposalStatus::Executed;
                    entry.transfers.get(proposal_index).copied()
                };
                if let Some((recipient, lamports)) = transfer {
                    let from = ledger.balances.entry(*vault_address).or_insert(0);
                    *from = from.saturating_sub(lamports);
                    *ledger.balances.entry(recipient).or_insert(0) += lamports;
                }
                Ok(())
            }
        }
    }

    fn entry_mut<'a>(ledger: &'a mut Ledger, vault_address: &Address) -> Result<&'a mut VaultEntry> {
        ledger.vaults.get_mut(vault_address).ok_or_else(|| WalletError::VaultNotFound(vault_address.to_string()))
    }

    fn vote(ledger: &mut Ledger, vault_address: &Address, index: u64, signer: &Address, kind: VoteKind) -> Result<()> {
        let entry = Self::entry_mut(ledger, vault_address)?;
        let member = Self::member_of(entry, signer)?.clone();
        let threshold = entry.vault.threshold;
        let voter_count = entry.vault.voter_count();
        let proposal = entry
            .proposals
            .get_mut(&index)
            .ok_or(WalletError::ProposalNotFound { vault: vault_address.to_string(), index })?;
        proposal.record_vote(&member, kind)?;
        proposal.resolve(threshold, voter_count);
        Ok(())
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn get_account_balance(&self, address: &Address) -> Result<Lamports> {
        Ok(self.lock().balances.get(address).copied().unwrap_or(0))
    }

    async fn get_program_accounts(&self, program_id: &Address) -> Result<Vec<AccountInfo>> {
        if program_id != &self.program_id {
            return Ok(Vec::new());
        }
        let ledger = self.lock();
        let mut accounts: Vec<AccountInfo> = ledger
            .vaults
            .values()
            .map(|entry| AccountInfo {
                address: entry.vault.address,
                lamports: ledger.balances.get(&entry.vault.address).copied().unwrap_or(0),
                data: encode_vault(&entry.vault),
            })
            .collect();
        accounts.extend(ledger.junk_accounts.iter().cloned());
        Ok(accounts)
    }

    async fn get_parsed_account(&self, address: &Address) -> Result<Option<AccountInfo>> {
        let ledger = self.lock();
        Ok(ledger.vaults.get(address).map(|entry| AccountInfo {
            address: entry.vault.address,
            lamports: ledger.balances.get(address).copied().unwrap_or(0),
            data: encode_vault(&entry.vault),
        }))
    }

    async fn get_proposal_account(&self, vault: &Address, index: u64) -> Result<Option<AccountInfo>> {
        let ledger = self.lock();
        let Some(entry) = ledger.vaults.get(vault) else {
            return Ok(None);
        };
        Ok(entry.proposals.get(&index).map(|proposal| AccountInfo {
            address: Self::proposal_account_address(vault, index),
            lamports: 0,
            data: encode_proposal(proposal),
        }))
    }
}

#[async_trait]
impl ChainWriter for MockChain {
    async fn submit(&self, intent: &TransactionIntent, signer: &UnlockedIdentity) -> Result<TxSignature> {
        self.apply(intent, &signer.public_address)?;
        let mut ledger = self.lock();
        let signature = TxSignature::new(format!("mock-sig-{}", ledger.next_signature));
        ledger.next_signature += 1;
        Ok(signature)
    }

    async fn confirm(&self, signature: &TxSignature) -> Result<Confirmation> {
        let mut ledger = self.lock();
        if ledger.fail_next_confirmation {
            ledger.fail_next_confirmation = false;
            return Ok(Confirmation::Failed { reason: format!("{signature} dropped before finality") });
        }
        Ok(Confirmation::Finalized)
    }
}
