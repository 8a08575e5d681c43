//! Proposal projection: vote sets, classification, and the pure predicates
//! shared by every front end.

mod status;

pub use status::ProposalStatus;

use crate::domain::permission::Member;
use crate::foundation::{Address, Result, WalletError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VoteKind {
    Approve,
    Reject,
}

/// Read-through projection of one on-chain proposal. Indices are monotonic
/// per vault, starting at 1. A member appears in at most one of the two
/// vote sets; votes are not changeable once cast.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Proposal {
    pub index: u64,
    pub status: ProposalStatus,
    pub approvals: BTreeSet<Address>,
    pub rejections: BTreeSet<Address>,
}

impl Proposal {
    pub fn new(index: u64, status: ProposalStatus) -> Self {
        Self { index, status, approvals: BTreeSet::new(), rejections: BTreeSet::new() }
    }

    pub fn has_voted(&self, address: &Address) -> bool {
        self.approvals.contains(address) || self.rejections.contains(address)
    }

    pub fn can_vote(&self, member: &Member) -> bool {
        self.status == ProposalStatus::Active && member.can_vote() && !self.has_voted(&member.address)
    }

    /// Execute is intentionally open to any member with the capability, not
    /// just the proposer: once consensus is reached anyone authorized may
    /// trigger settlement.
    pub fn can_execute(&self, member: &Member) -> bool {
        self.status == ProposalStatus::Approved && member.can_execute()
    }

    /// Re-derive the aggregate status from vote counts, mirroring the flip
    /// the program performs on-chain: enough approvals make the proposal
    /// Approved, and enough rejections make the threshold unreachable.
    pub fn resolve(&mut self, threshold: u16, voter_count: usize) {
        if self.status != ProposalStatus::Active {
            return;
        }
        if self.approvals.len() >= threshold as usize {
            self.status = ProposalStatus::Approved;
        } else if self.rejections.len() > voter_count.saturating_sub(threshold as usize) {
            self.status = ProposalStatus::Rejected;
        }
    }

    pub fn record_vote(&mut self, member: &Member, vote: VoteKind) -> Result<()> {
        if self.status != ProposalStatus::Active {
            return Err(WalletError::ProposalNotActionable {
                index: self.index,
                current: self.status.to_string(),
                required: ProposalStatus::Active.to_string(),
            });
        }
        if !member.can_vote() {
            return Err(WalletError::permission_denied(member.address.to_string(), "vote"));
        }
        if self.has_voted(&member.address) {
            return Err(WalletError::AlreadyVoted { member: member.address.to_string(), index: self.index });
        }
        match vote {
            VoteKind::Approve => self.approvals.insert(member.address),
            VoteKind::Reject => self.rejections.insert(member.address),
        };
        Ok(())
    }
}

/// Badge count for front ends: Approved still needs a human to execute, so
/// it counts as pending alongside Active.
pub fn pending_count(proposals: &[Proposal]) -> usize {
    proposals.iter().filter(|p| matches!(p.status, ProposalStatus::Active | ProposalStatus::Approved)).count()
}
