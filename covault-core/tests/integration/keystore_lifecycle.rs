use crate::fixtures::builders::fast_kdf;
use covault_core::foundation::WalletError;
use covault_core::infrastructure::keystore::Keystore;
use covault_core::infrastructure::storage::{FileBackend, MemoryBackend, StorageBackend};
use std::sync::Arc;

#[tokio::test]
async fn test_create_status_unlock_full_cycle() {
    let keystore = Keystore::new(Arc::new(MemoryBackend::new())).with_kdf_params(fast_kdf());

    let created = keystore.create("correcthorsebattery", "my wallet").await.unwrap();

    let status = keystore.status().await.unwrap();
    assert!(status.exists);
    assert_eq!(status.public_address, Some(created));

    let err = keystore.unlock("wrong").await.unwrap_err();
    assert!(matches!(err, WalletError::InvalidPassword));

    let unlocked = keystore.unlock("correcthorsebattery").await.unwrap();
    assert_eq!(unlocked.public_address, created);
    assert_eq!(unlocked.keypair_bytes().len(), 64);
}

#[tokio::test]
async fn test_identity_survives_backend_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let created = {
        let backend = Arc::new(FileBackend::open(dir.path()).await.unwrap());
        let keystore = Keystore::new(backend).with_kdf_params(fast_kdf());
        keystore.create("correcthorsebattery", "durable wallet").await.unwrap()
    };

    let backend = Arc::new(FileBackend::open(dir.path()).await.unwrap());
    let keystore = Keystore::new(backend).with_kdf_params(fast_kdf());
    let status = keystore.status().await.unwrap();
    assert_eq!(status.public_address, Some(created));
    assert_eq!(status.display_name.as_deref(), Some("durable wallet"));

    let unlocked = keystore.unlock("correcthorsebattery").await.unwrap();
    assert_eq!(unlocked.public_address, created);
}

#[tokio::test]
async fn test_delete_is_terminal_for_the_identity() {
    let backend = Arc::new(MemoryBackend::new());
    let keystore = Keystore::new(backend.clone()).with_kdf_params(fast_kdf());
    keystore.create("correcthorsebattery", "wallet").await.unwrap();
    keystore.delete().await.unwrap();

    assert!(!keystore.status().await.unwrap().exists);
    assert!(matches!(keystore.unlock("correcthorsebattery").await, Err(WalletError::IdentityNotFound)));
    // Nothing of the identity remains in storage.
    assert!(backend.get("identity").await.unwrap().is_none());
}

#[tokio::test]
async fn test_export_requires_the_password() {
    let keystore = Keystore::new(Arc::new(MemoryBackend::new())).with_kdf_params(fast_kdf());
    let created = keystore.create("correcthorsebattery", "wallet").await.unwrap();

    assert!(matches!(keystore.export_secret("nope").await, Err(WalletError::InvalidPassword)));

    let exported = keystore.export_secret("correcthorsebattery").await.unwrap();
    assert_eq!(exported.public_address, created);
    assert!(!exported.warning().is_empty());
    // The exported secret decodes back to the same public key.
    assert_eq!(&exported.secret.expose_secret()[32..], created.as_bytes());
}
