use crate::foundation::WalletError;

/// Base58 public keys render as 32 to 44 characters; the same bounds gate
/// share-link extraction before any decode is attempted.
pub const BASE58_PUBKEY_MIN_LEN: usize = 32;
pub const BASE58_PUBKEY_MAX_LEN: usize = 44;

pub fn encode_base58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode a base58 string that must represent exactly 32 bytes.
pub fn decode_base58_32(s: &str) -> Result<[u8; 32], WalletError> {
    let decoded = bs58::decode(s)
        .into_vec()
        .map_err(|e| WalletError::invalid_address(s, format!("not base58: {e}")))?;
    let len = decoded.len();
    decoded
        .try_into()
        .map_err(|_| WalletError::invalid_address(s, format!("decodes to {len} bytes, expected 32")))
}

pub fn is_base58_char(c: char) -> bool {
    c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l')
}

/// Cheap shape check used by share-link extraction; full validation is the
/// 32-byte decode in `decode_base58_32`.
pub fn looks_like_base58_pubkey(s: &str) -> bool {
    (BASE58_PUBKEY_MIN_LEN..=BASE58_PUBKEY_MAX_LEN).contains(&s.len()) && s.chars().all(is_base58_char)
}

pub fn encode_base64(bytes: &[u8]) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine};
    STANDARD.encode(bytes)
}

pub fn decode_base64(s: &str) -> Result<Vec<u8>, WalletError> {
    use base64::{engine::general_purpose::STANDARD, Engine};
    STANDARD.decode(s).map_err(|e| WalletError::malformed_blob(format!("base64 decode failed: {e}")))
}
