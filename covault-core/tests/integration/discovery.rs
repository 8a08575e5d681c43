use crate::fixtures::builders::{addr, participant, VaultBuilder};
use covault_core::domain::permission::Capabilities;
use covault_core::domain::share_link;
use covault_core::foundation::WalletError;
use covault_core::infrastructure::chain::MockChain;
use serde_json::json;
use std::sync::Arc;

const PW: &str = "password-aaa";

#[tokio::test]
async fn test_discovery_filters_by_membership_and_skips_junk() {
    let chain = Arc::new(MockChain::new(addr(250)));
    let (service, owner) = participant(&chain, PW).await;

    // 10 program accounts: 2 vaults with `owner` in the member set, 6
    // vaults belonging to strangers, 2 that do not parse as vaults at all.
    for seed in 0..2u8 {
        chain.add_vault(
            VaultBuilder::default().address(addr(10 + seed)).member(owner, Capabilities::voter()).member(addr(70 + seed), Capabilities::all()).threshold(1).build(),
        );
    }
    for seed in 0..6u8 {
        chain.add_vault(VaultBuilder::default().address(addr(20 + seed)).member(addr(80 + seed), Capabilities::all()).threshold(1).build());
    }
    chain.add_junk_account(addr(30), json!({ "mint": "spl-token", "decimals": 9 }));
    chain.add_junk_account(addr(31), json!([1, 2, 3]));

    let discovered = service.registry().discover(&owner, chain.as_ref()).await.unwrap();
    assert_eq!(discovered.len(), 2);
    let mut found: Vec<_> = discovered.iter().map(|v| v.address).collect();
    found.sort();
    assert_eq!(found, vec![addr(10), addr(11)]);
}

#[tokio::test]
async fn test_import_by_share_link_registers_once() {
    let chain = Arc::new(MockChain::new(addr(250)));
    let (service, owner) = participant(&chain, PW).await;

    let vault = VaultBuilder::default().address(addr(10)).member(owner, Capabilities::voter()).threshold(1).build();
    chain.add_vault(vault);

    let link = share_link::vault_link("https://covault.app", &addr(10));
    let imported = service.registry().import(&owner, &link, chain.as_ref()).await.unwrap();
    assert_eq!(imported.address, addr(10));

    // Importing again via the raw address is idempotent.
    service.registry().import(&owner, &addr(10).to_string(), chain.as_ref()).await.unwrap();
    assert_eq!(service.registry().list(&owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_import_nonexistent_vault_fails() {
    let chain = Arc::new(MockChain::new(addr(250)));
    let (service, owner) = participant(&chain, PW).await;

    let err = service.registry().import(&owner, &addr(10).to_string(), chain.as_ref()).await.unwrap_err();
    assert!(matches!(err, WalletError::VaultNotFound(_)));
}

#[tokio::test]
async fn test_import_when_not_a_member_fails() {
    let chain = Arc::new(MockChain::new(addr(250)));
    let (service, owner) = participant(&chain, PW).await;

    chain.add_vault(VaultBuilder::default().address(addr(10)).member(addr(80), Capabilities::all()).threshold(1).build());

    let err = service.registry().import(&owner, &addr(10).to_string(), chain.as_ref()).await.unwrap_err();
    assert!(matches!(err, WalletError::NotAMember { .. }));
    assert!(service.registry().list(&owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_import_rejects_malformed_input_before_io() {
    let chain = Arc::new(MockChain::new(addr(250)));
    let (service, owner) = participant(&chain, PW).await;

    let err = service.registry().import(&owner, "https://covault.app/about", chain.as_ref()).await.unwrap_err();
    assert!(matches!(err, WalletError::InvalidShareLink { .. }));
}
