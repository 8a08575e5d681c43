//! Encrypted keystore: owns the lifecycle of exactly one identity.
//! States: Absent -> Locked -> Unlocked (ephemeral) -> Locked, terminal Deleted.

pub mod audit;
mod cipher;
mod secret;

pub use cipher::{derive_key, EncryptedBlob, KdfParams, NONCE_LEN, SALT_LEN};
pub use secret::SecretBytes;

use crate::foundation::{now_nanos, Address, Result, WalletError};
use crate::infrastructure::keystore::audit::{KeystoreAuditLogger, KeystoreEvent, KeystoreOperation, NoopAuditLogger, OperationResult};
use crate::infrastructure::storage::StorageBackend;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use zeroize::Zeroizing;

const IDENTITY_KEY: &str = "identity";
pub const MIN_PASSWORD_LEN: usize = 8;
const KEYPAIR_LEN: usize = 64;

/// The only entity the keystore persists. `encrypted_secret` is an opaque
/// sealed blob; the raw keypair never touches storage or logs.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IdentityRecord {
    pub display_name: String,
    pub public_address: Address,
    pub encrypted_secret: String,
    pub created_at_nanos: u64,
}

/// Safe to request at any time; never requires a password.
#[derive(Clone, Debug)]
pub struct KeystoreStatus {
    pub exists: bool,
    pub public_address: Option<Address>,
    pub display_name: Option<String>,
}

/// Decrypted signing material, valid for the duration of the caller's
/// operation only. Callers must not cache this across operations.
pub struct UnlockedIdentity {
    pub public_address: Address,
    secret: SecretBytes,
}

impl UnlockedIdentity {
    /// 64 bytes: 32-byte seed followed by the 32-byte public key.
    pub fn keypair_bytes(&self) -> &[u8] {
        self.secret.expose_secret()
    }
}

impl std::fmt::Debug for UnlockedIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnlockedIdentity").field("public_address", &self.public_address.to_string()).finish_non_exhaustive()
    }
}

/// The only sanctioned path for secret material to leave the keystore.
pub struct ExportedSecret {
    pub public_address: Address,
    pub secret: SecretBytes,
}

impl ExportedSecret {
    pub const WARNING: &'static str =
        "anyone holding this secret key controls the wallet; store it offline and never share it";

    pub fn warning(&self) -> &'static str {
        Self::WARNING
    }
}

pub struct Keystore {
    backend: Arc<dyn StorageBackend>,
    audit: Arc<dyn KeystoreAuditLogger>,
    kdf: KdfParams,
}

impl Keystore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend, audit: Arc::new(NoopAuditLogger), kdf: KdfParams::default() }
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn KeystoreAuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_kdf_params(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    pub async fn status(&self) -> Result<KeystoreStatus> {
        Ok(match self.load_record().await? {
            Some(record) => KeystoreStatus {
                exists: true,
                public_address: Some(record.public_address),
                display_name: Some(record.display_name),
            },
            None => KeystoreStatus { exists: false, public_address: None, display_name: None },
        })
    }

    /// Generates a fresh keypair, seals it under `password`, persists the
    /// identity, and returns only the public address.
    pub async fn create(&self, password: &str, display_name: &str) -> Result<Address> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(WalletError::WeakPassword { min_len: MIN_PASSWORD_LEN });
        }
        if self.load_record().await?.is_some() {
            return Err(WalletError::IdentityAlreadyExists);
        }

        let signing = SigningKey::generate(&mut OsRng);
        let public_address = Address::new(signing.verifying_key().to_bytes());
        let keypair = Zeroizing::new(signing.to_keypair_bytes());
        let blob = EncryptedBlob::seal_with_params(keypair.as_ref(), password, self.kdf)?;

        let record = IdentityRecord {
            display_name: display_name.to_string(),
            public_address,
            encrypted_secret: blob.encode(),
            created_at_nanos: now_nanos(),
        };
        let result = self.store_record(&record).await;
        self.audit.log(KeystoreEvent::new(
            KeystoreOperation::Created,
            Some(public_address.to_string()),
            OperationResult::from_result(&result),
        ))?;
        result?;

        log::info!("created identity public_address={public_address} display_name={display_name}");
        Ok(public_address)
    }

    /// Reconstructs the signing key for the duration of the caller's
    /// operation. Long-lived caching of the result is explicitly
    /// discouraged.
    pub async fn unlock(&self, password: &str) -> Result<UnlockedIdentity> {
        let record = self.load_record().await?.ok_or(WalletError::IdentityNotFound)?;
        let result = self.unlock_record(&record, password);
        self.audit.log(KeystoreEvent::new(
            KeystoreOperation::Unlocked,
            Some(record.public_address.to_string()),
            OperationResult::from_result(&result),
        ))?;
        result
    }

    /// Identical authorization path as `unlock`; the returned type carries
    /// the mandatory caller-facing warning.
    pub async fn export_secret(&self, password: &str) -> Result<ExportedSecret> {
        let unlocked = self.unlock(password).await?;
        self.audit.log(KeystoreEvent::new(
            KeystoreOperation::Exported,
            Some(unlocked.public_address.to_string()),
            OperationResult::Success,
        ))?;
        log::warn!("secret key exported for public_address={}", unlocked.public_address);
        Ok(ExportedSecret { public_address: unlocked.public_address, secret: unlocked.secret })
    }

    /// Irreversible. Requires no password: losing the password must not
    /// make self-destruction impossible. Call sites gate this behind an
    /// explicit user confirmation.
    pub async fn delete(&self) -> Result<()> {
        let record = self.load_record().await?.ok_or(WalletError::IdentityNotFound)?;
        let result = self.backend.remove(IDENTITY_KEY).await;
        self.audit.log(KeystoreEvent::new(
            KeystoreOperation::Deleted,
            Some(record.public_address.to_string()),
            OperationResult::from_result(&result),
        ))?;
        result?;
        log::info!("deleted identity public_address={}", record.public_address);
        Ok(())
    }

    fn unlock_record(&self, record: &IdentityRecord, password: &str) -> Result<UnlockedIdentity> {
        let blob = EncryptedBlob::decode(&record.encrypted_secret)?;
        let plaintext = blob.open(password).map_err(|e| match e {
            WalletError::AuthenticationFailed => WalletError::InvalidPassword,
            other => other,
        })?;

        // The blob authenticated, so anything malformed past this point is
        // a corrupted wallet, not a wrong password.
        if plaintext.len() != KEYPAIR_LEN {
            return Err(WalletError::CorruptedIdentity { details: format!("keypair is {} bytes, expected {KEYPAIR_LEN}", plaintext.len()) });
        }
        let seed: [u8; 32] = plaintext[..32]
            .try_into()
            .map_err(|_| WalletError::CorruptedIdentity { details: "seed half truncated".to_string() })?;
        let derived_public = SigningKey::from_bytes(&seed).verifying_key().to_bytes();
        if derived_public != plaintext[32..] {
            return Err(WalletError::CorruptedIdentity { details: "public half does not match the secret seed".to_string() });
        }
        if Address::new(derived_public) != record.public_address {
            return Err(WalletError::CorruptedIdentity { details: "keypair does not match the recorded address".to_string() });
        }

        Ok(UnlockedIdentity { public_address: record.public_address, secret: SecretBytes::from_slice(&plaintext) })
    }

    async fn load_record(&self) -> Result<Option<IdentityRecord>> {
        match self.backend.get(IDENTITY_KEY).await? {
            None => Ok(None),
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        }
    }

    async fn store_record(&self, record: &IdentityRecord) -> Result<()> {
        self.backend.set(IDENTITY_KEY, serde_json::to_vec(record)?).await
    }
}
