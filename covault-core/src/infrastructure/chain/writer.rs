use crate::domain::permission::Member;
use crate::foundation::{Address, Lamports, Result, TxSignature};
use crate::infrastructure::keystore::UnlockedIdentity;
use async_trait::async_trait;

/// What the client wants the program to do. Instruction encoding and
/// signing are the writer's job; these carry only the decision.
#[derive(Clone, Debug)]
pub enum TransactionIntent {
    CreateVault { vault_address: Address, create_key: Address, threshold: u16, members: Vec<Member> },
    Propose { vault_address: Address, recipient: Address, lamports: Lamports },
    Approve { vault_address: Address, proposal_index: u64 },
    Reject { vault_address: Address, proposal_index: u64 },
    Execute { vault_address: Address, proposal_index: u64 },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Confirmation {
    Finalized,
    Failed { reason: String },
}

/// Write access to the chain. A submitted-but-unconfirmed transaction is
/// not yet a state change; `confirm` is the true completion point and its
/// timeout/retry policy belongs to the collaborator, not this crate.
#[async_trait]
pub trait ChainWriter: Send + Sync {
    async fn submit(&self, intent: &TransactionIntent, signer: &UnlockedIdentity) -> Result<TxSignature>;

    async fn confirm(&self, signature: &TxSignature) -> Result<Confirmation>;
}
