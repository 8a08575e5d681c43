use crate::fixtures::builders::{addr, member, participant};
use covault_core::domain::permission::Capabilities;
use covault_core::domain::proposal::ProposalStatus;
use covault_core::foundation::{Address, WalletError};
use covault_core::infrastructure::chain::MockChain;
use std::sync::Arc;

const PW_A: &str = "password-aaa";
const PW_B: &str = "password-bbb";
const PW_C: &str = "password-ccc";

/// 2-of-3 vault: A(propose,vote,execute), B(vote), C(vote).
async fn two_of_three(
    chain: &Arc<MockChain>,
) -> (covault_core::application::VaultService, covault_core::application::VaultService, covault_core::application::VaultService, Address)
{
    let (service_a, a) = participant(chain, PW_A).await;
    let (service_b, b) = participant(chain, PW_B).await;
    let (service_c, c) = participant(chain, PW_C).await;

    let vault_address = addr(210);
    let members = vec![member(a, Capabilities::all()), member(b, Capabilities::voter()), member(c, Capabilities::voter())];
    let (created, warnings) = service_a.create_vault(PW_A, vault_address, addr(211), 2, members).await.unwrap();
    assert_eq!(created, vault_address);
    assert!(warnings.is_empty());

    (service_a, service_b, service_c, vault_address)
}

#[tokio::test]
async fn test_full_vote_and_execute_flow() {
    let chain = Arc::new(MockChain::new(addr(250)));
    let (service_a, service_b, service_c, vault) = two_of_three(&chain).await;

    let recipient = addr(240);
    chain.set_balance(vault, 1_000);

    // A creates proposal #1.
    let index = service_a.propose_transfer(PW_A, &vault, &recipient.to_string(), 700).await.unwrap();
    assert_eq!(index, 1);
    let recent = service_a.list_recent(&vault, 20).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].status, ProposalStatus::Active);

    // B approves: 1 of 2, still Active.
    service_b.approve(PW_B, &vault, index).await.unwrap();
    let recent = service_b.list_recent(&vault, 20).await.unwrap();
    assert_eq!(recent[0].status, ProposalStatus::Active);
    assert_eq!(recent[0].approvals.len(), 1);
    assert_eq!(service_b.pending_badge(&vault).await.unwrap(), 1);

    // A approves: threshold reached.
    service_a.approve(PW_A, &vault, index).await.unwrap();
    let recent = service_a.list_recent(&vault, 20).await.unwrap();
    assert_eq!(recent[0].status, ProposalStatus::Approved);
    // Approved still counts as pending: execution is a human action.
    assert_eq!(service_a.pending_badge(&vault).await.unwrap(), 1);

    // A executes; funds move.
    service_a.execute(PW_A, &vault, index).await.unwrap();
    let recent = service_a.list_recent(&vault, 20).await.unwrap();
    assert_eq!(recent[0].status, ProposalStatus::Executed);
    assert_eq!(service_a.vault_balance(&vault).await.unwrap(), 300);
    assert_eq!(service_a.pending_badge(&vault).await.unwrap(), 0);

    // C votes after settlement: State error naming both states.
    let err = service_c.approve(PW_C, &vault, index).await.unwrap_err();
    match err {
        WalletError::ProposalNotActionable { current, required, .. } => {
            assert_eq!(current, "Executed");
            assert_eq!(required, "Active");
        }
        other => panic!("expected ProposalNotActionable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_double_vote_rejected_before_submission() {
    let chain = Arc::new(MockChain::new(addr(250)));
    let (service_a, service_b, _service_c, vault) = two_of_three(&chain).await;

    let index = service_a.propose_transfer(PW_A, &vault, &addr(240).to_string(), 10).await.unwrap();
    service_b.approve(PW_B, &vault, index).await.unwrap();
    let err = service_b.reject(PW_B, &vault, index).await.unwrap_err();
    assert!(matches!(err, WalletError::AlreadyVoted { .. }));
}

#[tokio::test]
async fn test_vote_only_member_cannot_execute() {
    let chain = Arc::new(MockChain::new(addr(250)));
    let (service_a, service_b, _service_c, vault) = two_of_three(&chain).await;

    let index = service_a.propose_transfer(PW_A, &vault, &addr(240).to_string(), 10).await.unwrap();
    service_a.approve(PW_A, &vault, index).await.unwrap();
    service_b.approve(PW_B, &vault, index).await.unwrap();

    let err = service_b.execute(PW_B, &vault, index).await.unwrap_err();
    assert!(matches!(err, WalletError::PermissionDenied { .. }));
}

#[tokio::test]
async fn test_non_member_is_rejected_after_lookup() {
    let chain = Arc::new(MockChain::new(addr(250)));
    let (service_a, _service_b, _service_c, vault) = two_of_three(&chain).await;
    // A fourth identity that appears in no member set.
    let (service_d, _) = participant(&chain, "password-ddd").await;

    service_a.propose_transfer(PW_A, &vault, &addr(240).to_string(), 10).await.unwrap();
    let err = service_d.approve("password-ddd", &vault, 1).await.unwrap_err();
    assert!(matches!(err, WalletError::NotAMember { .. }));
}

#[tokio::test]
async fn test_input_errors_precede_any_chain_read() {
    let chain = Arc::new(MockChain::new(addr(250)));
    let (service_a, _service_b, _service_c, _vault) = two_of_three(&chain).await;

    // Unknown vault address, but the amount check fires first.
    let missing_vault = addr(99);
    let err = service_a.propose_transfer(PW_A, &missing_vault, &addr(240).to_string(), 0).await.unwrap_err();
    assert!(matches!(err, WalletError::AmountNotPositive));

    let err = service_a.propose_transfer(PW_A, &missing_vault, "not-an-address", 10).await.unwrap_err();
    assert!(matches!(err, WalletError::InvalidAddress { .. }));
}

#[tokio::test]
async fn test_confirmation_failure_is_not_silent_success() {
    let chain = Arc::new(MockChain::new(addr(250)));
    let (service_a, _service_b, _service_c, vault) = two_of_three(&chain).await;

    chain.fail_next_confirmation();
    let err = service_a.propose_transfer(PW_A, &vault, &addr(240).to_string(), 10).await.unwrap_err();
    assert!(matches!(err, WalletError::SubmissionFailed { .. }));
}

#[tokio::test]
async fn test_invalid_threshold_blocks_vault_creation() {
    let chain = Arc::new(MockChain::new(addr(250)));
    let (service_a, a) = participant(&chain, PW_A).await;

    let members = vec![member(a, Capabilities::all()), member(addr(7), Capabilities::voter())];
    let err = service_a.create_vault(PW_A, addr(210), addr(211), 3, members).await.unwrap_err();
    assert!(matches!(err, WalletError::InvalidThreshold { threshold: 3, voters: 2 }));
}
