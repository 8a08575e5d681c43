use crate::fixtures::builders::{addr, member};
use covault_core::domain::permission::{validate_members, validate_threshold, Capabilities, MemberWarning};
use covault_core::foundation::WalletError;

#[test]
fn test_threshold_when_within_voter_count_then_valid() {
    let members = vec![
        member(addr(1), Capabilities::all()),
        member(addr(2), Capabilities::voter()),
        member(addr(3), Capabilities { propose: true, vote: false, execute: false }),
    ];
    // 3 members, 2 with vote permission.
    assert!(validate_threshold(1, &members).is_ok());
    assert!(validate_threshold(2, &members).is_ok());
}

#[test]
fn test_threshold_when_exceeds_voters_then_rejects() {
    let members = vec![member(addr(1), Capabilities::all()), member(addr(2), Capabilities::voter())];
    let err = validate_threshold(3, &members).unwrap_err();
    assert!(matches!(err, WalletError::InvalidThreshold { threshold: 3, voters: 2 }));
}

#[test]
fn test_threshold_zero_always_rejects() {
    let members = vec![member(addr(1), Capabilities::all())];
    assert!(matches!(validate_threshold(0, &members), Err(WalletError::InvalidThreshold { .. })));
}

#[test]
fn test_threshold_counts_only_voting_members() {
    // Execute-only and propose-only members do not raise the ceiling.
    let members = vec![
        member(addr(1), Capabilities { propose: false, vote: false, execute: true }),
        member(addr(2), Capabilities { propose: true, vote: false, execute: false }),
        member(addr(3), Capabilities::voter()),
    ];
    assert!(validate_threshold(1, &members).is_ok());
    assert!(matches!(validate_threshold(2, &members), Err(WalletError::InvalidThreshold { .. })));
}

#[test]
fn test_members_when_duplicate_then_rejects() {
    let members = vec![member(addr(1), Capabilities::all()), member(addr(1), Capabilities::voter())];
    assert!(matches!(validate_members(&members), Err(WalletError::DuplicateMember(_))));
}

#[test]
fn test_members_when_inert_then_warns_not_blocks() {
    let members = vec![member(addr(1), Capabilities::all()), member(addr(2), Capabilities::none())];
    let warnings = validate_members(&members).unwrap();
    assert_eq!(warnings, vec![MemberWarning::InertMember { address: addr(2).to_string() }]);
}
