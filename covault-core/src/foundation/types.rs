use crate::foundation::util::encoding::{decode_base58_32, encode_base58};
use crate::foundation::WalletError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub type Lamports = u64;

pub const LAMPORTS_PER_SOL: Lamports = 1_000_000_000;

/// Validate an untrusted amount string (UI or CLI input) and convert it to
/// lamports. Must be a positive finite number.
pub fn parse_sol_amount(input: &str) -> Result<Lamports, WalletError> {
    let value: f64 = input.trim().parse().map_err(|_| WalletError::AmountNotPositive)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(WalletError::AmountNotPositive);
    }
    let lamports = (value * LAMPORTS_PER_SOL as f64).round();
    if lamports < 1.0 || lamports >= u64::MAX as f64 {
        return Err(WalletError::AmountNotPositive);
    }
    Ok(lamports as Lamports)
}

/// An ed25519 public key rendered as base58, the universal account
/// identifier on the chain (wallets, vaults, programs, treasuries).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Address([u8; 32]);

impl Address {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_base58(&self.0))
    }
}

impl FromStr for Address {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(decode_base58_32(s)?))
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            let bytes = <[u8; 32]>::deserialize(deserializer)?;
            Ok(Self(bytes))
        }
    }
}

/// Signature of a submitted transaction, as reported by the chain writer.
/// Opaque to this crate; used only for confirmation and reporting.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TxSignature(String);

impl TxSignature {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TxSignature {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
