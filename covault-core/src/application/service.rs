//! Orchestration over keystore, registry and the chain boundary. Every
//! mutating operation follows the same path: validate inputs before any
//! I/O, refetch authoritative state, authorize locally, unlock, submit,
//! confirm.

use crate::application::proposals;
use crate::application::registry::VaultRegistry;
use crate::domain::permission::{validate_members, validate_threshold, Member, MemberWarning};
use crate::domain::proposal::{Proposal, ProposalStatus, VoteKind};
use crate::domain::Vault;
use crate::foundation::{Address, Lamports, Result, TxSignature, WalletError};
use crate::infrastructure::chain::decode::{decode_proposal, decode_vault};
use crate::infrastructure::chain::{ChainReader, ChainWriter, Confirmation, TransactionIntent};
use crate::infrastructure::keystore::{Keystore, UnlockedIdentity};
use std::sync::Arc;

pub struct VaultService {
    keystore: Keystore,
    registry: VaultRegistry,
    reader: Arc<dyn ChainReader>,
    writer: Arc<dyn ChainWriter>,
}

impl VaultService {
    pub fn new(keystore: Keystore, registry: VaultRegistry, reader: Arc<dyn ChainReader>, writer: Arc<dyn ChainWriter>) -> Self {
        Self { keystore, registry, reader, writer }
    }

    pub fn keystore(&self) -> &Keystore {
        &self.keystore
    }

    pub fn registry(&self) -> &VaultRegistry {
        &self.registry
    }

    /// Validates the member set and threshold before anything is signed or
    /// submitted; the program treats both as immutable creation-time
    /// configuration. The vault and create-key addresses come from the
    /// caller, which obtained them from the external SDK.
    pub async fn create_vault(
        &self,
        password: &str,
        vault_address: Address,
        create_key: Address,
        threshold: u16,
        members: Vec<Member>,
    ) -> Result<(Address, Vec<MemberWarning>)> {
        let warnings = validate_members(&members)?;
        for warning in &warnings {
            let MemberWarning::InertMember { address } = warning;
            log::warn!("vault member {address} has no capability and will be inert");
        }
        validate_threshold(threshold, &members)?;

        let signer = self.keystore.unlock(password).await?;
        let intent = TransactionIntent::CreateVault { vault_address, create_key, threshold, members };
        let signature = self.submit_and_confirm(&intent, &signer).await?;
        self.registry.register(&signer.public_address, &vault_address, &create_key).await?;
        log::info!("created vault {vault_address} signature={signature}");
        Ok((vault_address, warnings))
    }

    /// Proposes a transfer of `lamports` to `recipient` (untrusted input,
    /// validated before any I/O). Returns the expected proposal index.
    pub async fn propose_transfer(
        &self,
        password: &str,
        vault_address: &Address,
        recipient: &str,
        lamports: Lamports,
    ) -> Result<u64> {
        if lamports == 0 {
            return Err(WalletError::AmountNotPositive);
        }
        let recipient: Address = recipient.parse()?;

        let vault = self.fetch_vault(vault_address).await?;
        let member = self.own_membership(&vault).await?;
        if !member.can_propose() {
            return Err(WalletError::permission_denied(member.address.to_string(), "propose"));
        }

        let signer = self.keystore.unlock(password).await?;
        let intent = TransactionIntent::Propose { vault_address: *vault_address, recipient, lamports };
        let signature = self.submit_and_confirm(&intent, &signer).await?;
        let index = vault.transaction_index + 1;
        log::info!("proposed transfer vault={vault_address} index={index} signature={signature}");
        Ok(index)
    }

    pub async fn approve(&self, password: &str, vault_address: &Address, proposal_index: u64) -> Result<TxSignature> {
        self.cast_vote(password, vault_address, proposal_index, VoteKind::Approve).await
    }

    pub async fn reject(&self, password: &str, vault_address: &Address, proposal_index: u64) -> Result<TxSignature> {
        self.cast_vote(password, vault_address, proposal_index, VoteKind::Reject).await
    }

    /// Execute is open to any member with the capability once consensus is
    /// reached; it is not restricted to the proposer.
    pub async fn execute(&self, password: &str, vault_address: &Address, proposal_index: u64) -> Result<TxSignature> {
        let vault = self.fetch_vault(vault_address).await?;
        let proposal = self.fetch_proposal(&vault, proposal_index).await?;
        let member = self.own_membership(&vault).await?;
        if proposal.status != ProposalStatus::Approved {
            return Err(WalletError::ProposalNotActionable {
                index: proposal_index,
                current: proposal.status.to_string(),
                required: ProposalStatus::Approved.to_string(),
            });
        }
        if !member.can_execute() {
            return Err(WalletError::permission_denied(member.address.to_string(), "execute"));
        }

        let signer = self.keystore.unlock(password).await?;
        let intent = TransactionIntent::Execute { vault_address: *vault_address, proposal_index };
        let signature = self.submit_and_confirm(&intent, &signer).await?;
        log::info!("executed proposal vault={vault_address} index={proposal_index} signature={signature}");
        Ok(signature)
    }

    pub async fn vault_balance(&self, vault_address: &Address) -> Result<Lamports> {
        self.reader.get_account_balance(vault_address).await
    }

    pub async fn list_recent(&self, vault_address: &Address, window: u64) -> Result<Vec<Proposal>> {
        let vault = self.fetch_vault(vault_address).await?;
        proposals::list_recent(&vault, self.reader.as_ref(), window).await
    }

    pub async fn pending_badge(&self, vault_address: &Address) -> Result<usize> {
        let vault = self.fetch_vault(vault_address).await?;
        proposals::pending_badge(&vault, self.reader.as_ref(), proposals::DEFAULT_RECENT_WINDOW).await
    }

    async fn cast_vote(&self, password: &str, vault_address: &Address, proposal_index: u64, vote: VoteKind) -> Result<TxSignature> {
        let vault = self.fetch_vault(vault_address).await?;
        let mut proposal = self.fetch_proposal(&vault, proposal_index).await?;
        let member = self.own_membership(&vault).await?.clone();
        // Dry-run against the fetched projection; surfaces the same State
        // and Authorization errors the program would raise.
        proposal.record_vote(&member, vote)?;

        let signer = self.keystore.unlock(password).await?;
        let intent = match vote {
            VoteKind::Approve => TransactionIntent::Approve { vault_address: *vault_address, proposal_index },
            VoteKind::Reject => TransactionIntent::Reject { vault_address: *vault_address, proposal_index },
        };
        let signature = self.submit_and_confirm(&intent, &signer).await?;
        log::info!("voted {vote:?} vault={vault_address} index={proposal_index} signature={signature}");
        Ok(signature)
    }

    /// Projections are refetched before every action; cached copies are
    /// never trusted for vote counts, balances or status.
    async fn fetch_vault(&self, vault_address: &Address) -> Result<Vault> {
        let account = self
            .reader
            .get_parsed_account(vault_address)
            .await?
            .ok_or_else(|| WalletError::VaultNotFound(vault_address.to_string()))?;
        decode_vault(&account).ok_or_else(|| WalletError::VaultNotFound(vault_address.to_string()))
    }

    async fn fetch_proposal(&self, vault: &Vault, index: u64) -> Result<Proposal> {
        let account = self
            .reader
            .get_proposal_account(&vault.address, index)
            .await?
            .ok_or(WalletError::ProposalNotFound { vault: vault.address.to_string(), index })?;
        let mut proposal = decode_proposal(&account)?;
        proposal.resolve(vault.threshold, vault.voter_count());
        Ok(proposal)
    }

    async fn own_membership<'a>(&self, vault: &'a Vault) -> Result<&'a Member> {
        let address = self.own_address().await?;
        vault.member(&address).ok_or_else(|| WalletError::NotAMember { vault: vault.address.to_string(), member: address.to_string() })
    }

    // Public address only; authorization prechecks never need a password.
    async fn own_address(&self) -> Result<Address> {
        self.keystore.status().await?.public_address.ok_or(WalletError::IdentityNotFound)
    }

    async fn submit_and_confirm(&self, intent: &TransactionIntent, signer: &UnlockedIdentity) -> Result<TxSignature> {
        let signature = self.writer.submit(intent, signer).await?;
        match self.writer.confirm(&signature).await? {
            Confirmation::Finalized => Ok(signature),
            Confirmation::Failed { reason } => {
                Err(WalletError::SubmissionFailed { signature: signature.to_string(), reason })
            }
        }
    }
}
