use crate::fixtures::builders::{addr, member};
use covault_core::domain::permission::Capabilities;
use covault_core::domain::proposal::{pending_count, Proposal, ProposalStatus, VoteKind};
use covault_core::foundation::WalletError;

#[test]
fn test_two_approvals_against_threshold_two_yields_approved() {
    let mut proposal = Proposal::new(1, ProposalStatus::Active);
    proposal.record_vote(&member(addr(1), Capabilities::voter()), VoteKind::Approve).unwrap();
    proposal.record_vote(&member(addr(2), Capabilities::voter()), VoteKind::Approve).unwrap();
    proposal.resolve(2, 3);
    assert_eq!(proposal.status, ProposalStatus::Approved);
}

#[test]
fn test_can_execute_only_when_approved_and_capable() {
    let executor = member(addr(1), Capabilities::all());
    let voter_only = member(addr(2), Capabilities::voter());

    for status in [ProposalStatus::Draft, ProposalStatus::Active, ProposalStatus::Rejected, ProposalStatus::Executed] {
        assert!(!Proposal::new(1, status).can_execute(&executor));
    }
    let approved = Proposal::new(1, ProposalStatus::Approved);
    assert!(approved.can_execute(&executor));
    assert!(!approved.can_execute(&voter_only));
}

#[test]
fn test_member_in_approvals_cannot_vote_again() {
    let mut proposal = Proposal::new(1, ProposalStatus::Active);
    let voter = member(addr(1), Capabilities::voter());
    proposal.record_vote(&voter, VoteKind::Approve).unwrap();
    assert!(!proposal.can_vote(&voter));
    assert!(matches!(proposal.record_vote(&voter, VoteKind::Approve), Err(WalletError::AlreadyVoted { .. })));
}

#[test]
fn test_member_in_rejections_cannot_vote_again() {
    let mut proposal = Proposal::new(1, ProposalStatus::Active);
    let voter = member(addr(1), Capabilities::voter());
    proposal.record_vote(&voter, VoteKind::Reject).unwrap();
    assert!(!proposal.can_vote(&voter));
    assert!(matches!(proposal.record_vote(&voter, VoteKind::Approve), Err(WalletError::AlreadyVoted { .. })));
}

#[test]
fn test_approvals_and_rejections_stay_disjoint() {
    let mut proposal = Proposal::new(1, ProposalStatus::Active);
    let a = member(addr(1), Capabilities::voter());
    let b = member(addr(2), Capabilities::voter());
    proposal.record_vote(&a, VoteKind::Approve).unwrap();
    proposal.record_vote(&b, VoteKind::Reject).unwrap();
    assert!(proposal.approvals.contains(&a.address) && !proposal.rejections.contains(&a.address));
    assert!(proposal.rejections.contains(&b.address) && !proposal.approvals.contains(&b.address));
}

#[test]
fn test_classify_rejects_unknown_tags() {
    assert!(matches!(ProposalStatus::classify("finalizing"), Err(WalletError::UnknownStatus(_))));
}

#[test]
fn test_pending_badge_counts_active_and_approved() {
    let proposals = vec![
        Proposal::new(1, ProposalStatus::Executed),
        Proposal::new(2, ProposalStatus::Active),
        Proposal::new(3, ProposalStatus::Approved),
        Proposal::new(4, ProposalStatus::Rejected),
        Proposal::new(5, ProposalStatus::Cancelled),
        Proposal::new(6, ProposalStatus::Draft),
    ];
    assert_eq!(pending_count(&proposals), 2);
}
