use crate::domain::permission::Member;
use crate::foundation::{Result, WalletError};
use std::collections::HashSet;

/// Non-fatal findings from member-set validation. Inert members are legal
/// on-chain, so the client warns instead of blocking.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MemberWarning {
    InertMember { address: String },
}

/// The program treats threshold as immutable creation-time configuration,
/// so the bound `1 <= threshold <= voting members` is enforced here before
/// anything is submitted.
pub fn validate_threshold(threshold: u16, members: &[Member]) -> Result<()> {
    let voters = members.iter().filter(|m| m.can_vote()).count();
    if threshold == 0 || threshold as usize > voters {
        return Err(WalletError::InvalidThreshold { threshold, voters });
    }
    Ok(())
}

/// Rejects duplicate addresses; reports members with no capability as
/// warnings for the front end to surface.
pub fn validate_members(members: &[Member]) -> Result<Vec<MemberWarning>> {
    let mut seen = HashSet::new();
    let mut warnings = Vec::new();
    for member in members {
        if !seen.insert(member.address) {
            return Err(WalletError::DuplicateMember(member.address.to_string()));
        }
        if member.capabilities.is_inert() {
            warnings.push(MemberWarning::InertMember { address: member.address.to_string() });
        }
    }
    Ok(warnings)
}
