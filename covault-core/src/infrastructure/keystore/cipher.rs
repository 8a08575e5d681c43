//! Password-derived encryption for the identity secret
//! (Argon2id + ChaCha20-Poly1305).

use crate::foundation::util::encoding::{decode_base64, encode_base64};
use crate::foundation::{Result, WalletError};
use argon2::{Argon2, ParamsBuilder, Version};
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::ChaCha20Poly1305;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

const MAGIC: [u8; 4] = *b"CVLT";
const VERSION: u8 = 1;
pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
const HEADER_LEN: usize = 4 + 1 + 12 + SALT_LEN + NONCE_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub m_cost: u32,
    pub t_cost: u32,
    pub p_cost: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self { m_cost: 65536, t_cost: 3, p_cost: 4 }
    }
}

/// One sealed secret. The header (magic, version, KDF params, salt, nonce)
/// is authenticated as AAD, so any tampering fails the open.
#[derive(Debug, Clone)]
pub struct EncryptedBlob {
    pub version: u8,
    pub kdf: KdfParams,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext_and_tag: Vec<u8>,
}

pub fn derive_key(password: &str, salt: &[u8; SALT_LEN], params: &KdfParams) -> Result<Zeroizing<[u8; 32]>> {
    let mut key = Zeroizing::new([0u8; 32]);
    let argon2_params = ParamsBuilder::new()
        .m_cost(params.m_cost)
        .t_cost(params.t_cost)
        .p_cost(params.p_cost)
        .build()
        .map_err(|e| WalletError::CryptoError { operation: "argon2 params".to_string(), details: e.to_string() })?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, argon2_params);
    argon2
        .hash_password_into(password.as_bytes(), salt, key.as_mut())
        .map_err(|e| WalletError::CryptoError { operation: "key derivation".to_string(), details: e.to_string() })?;
    Ok(key)
}

impl EncryptedBlob {
    /// Encrypt with a fresh random salt and nonce on every call; nonce
    /// reuse under one key is structurally impossible here.
    pub fn seal(plaintext: &[u8], password: &str) -> Result<Self> {
        Self::seal_with_params(plaintext, password, KdfParams::default())
    }

    pub fn seal_with_params(plaintext: &[u8], password: &str, kdf: KdfParams) -> Result<Self> {
        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        let mut rng = OsRng;
        rng.fill_bytes(&mut salt);
        rng.fill_bytes(&mut nonce);

        let key = derive_key(password, &salt, &kdf)?;
        let header = Self { version: VERSION, kdf, salt, nonce, ciphertext_and_tag: Vec::new() };
        let aad = header.header_bytes();

        let key_bytes: &[u8; 32] = &key;
        let cipher = ChaCha20Poly1305::new(key_bytes.into());
        let ciphertext_and_tag = cipher
            .encrypt(&nonce.into(), Payload { msg: plaintext, aad: &aad })
            .map_err(|e| WalletError::CryptoError { operation: "encrypt".to_string(), details: e.to_string() })?;

        Ok(Self { ciphertext_and_tag, ..header })
    }

    /// Decrypt and authenticate. A wrong password and corrupted data are
    /// indistinguishable at this layer; both surface as
    /// `AuthenticationFailed`.
    pub fn open(&self, password: &str) -> Result<Zeroizing<Vec<u8>>> {
        if self.version != VERSION {
            return Err(WalletError::malformed_blob(format!("unsupported blob version {}", self.version)));
        }
        let key = derive_key(password, &self.salt, &self.kdf)?;
        let aad = self.header_bytes();
        let key_bytes: &[u8; 32] = &key;
        let cipher = ChaCha20Poly1305::new(key_bytes.into());
        let plaintext = cipher
            .decrypt(&self.nonce.into(), Payload { msg: self.ciphertext_and_tag.as_ref(), aad: &aad })
            .map_err(|_| WalletError::AuthenticationFailed)?;
        Ok(Zeroizing::new(plaintext))
    }

    /// Single opaque string form stored inside the identity record.
    pub fn encode(&self) -> String {
        encode_base64(&self.to_bytes())
    }

    pub fn decode(encoded: &str) -> Result<Self> {
        Self::from_bytes(&decode_base64(encoded)?)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = self.header_bytes();
        buf.extend_from_slice(&self.ciphertext_and_tag);
        buf
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(WalletError::malformed_blob("too short to hold a blob header"));
        }
        if data[0..4] != MAGIC {
            return Err(WalletError::malformed_blob("bad magic bytes"));
        }
        let version = data[4];
        if version != VERSION {
            return Err(WalletError::malformed_blob(format!("unsupported blob version {version}")));
        }
        let read_u32 = |range: std::ops::Range<usize>| -> Result<u32> {
            Ok(u32::from_le_bytes(data[range].try_into().map_err(|_| WalletError::malformed_blob("truncated KDF params"))?))
        };
        let kdf = KdfParams { m_cost: read_u32(5..9)?, t_cost: read_u32(9..13)?, p_cost: read_u32(13..17)? };
        let salt: [u8; SALT_LEN] = data[17..17 + SALT_LEN].try_into().map_err(|_| WalletError::malformed_blob("truncated salt"))?;
        let nonce: [u8; NONCE_LEN] =
            data[33..33 + NONCE_LEN].try_into().map_err(|_| WalletError::malformed_blob("truncated nonce"))?;
        let ciphertext_and_tag = data[HEADER_LEN..].to_vec();
        Ok(Self { version, kdf, salt, nonce, ciphertext_and_tag })
    }

    fn header_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN);
        buf.extend_from_slice(&MAGIC);
        buf.push(self.version);
        buf.extend_from_slice(&self.kdf.m_cost.to_le_bytes());
        buf.extend_from_slice(&self.kdf.t_cost.to_le_bytes());
        buf.extend_from_slice(&self.kdf.p_cost.to_le_bytes());
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.nonce);
        buf
    }
}
