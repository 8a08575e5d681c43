//! Share-link format owned by this system:
//! `<base>/vault/<address>` and `<base>/vault/<address>/proposal/<index>`.
//! One extraction pattern serves both the builder and the parser.

use crate::foundation::util::encoding::looks_like_base58_pubkey;
use crate::foundation::{Address, Result, WalletError};

const VAULT_SEGMENT: &str = "/vault/";
const PROPOSAL_SEGMENT: &str = "proposal";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ShareLink {
    pub vault_address: Address,
    pub proposal_index: Option<u64>,
}

pub fn vault_link(base_url: &str, vault_address: &Address) -> String {
    format!("{}{}{}", base_url.trim_end_matches('/'), VAULT_SEGMENT, vault_address)
}

pub fn proposal_link(base_url: &str, vault_address: &Address, index: u64) -> String {
    format!("{}/{}/{}", vault_link(base_url, vault_address), PROPOSAL_SEGMENT, index)
}

/// Parse a share URL of either form. The address segment must look like a
/// base58 public key (32-44 chars) and decode to exactly 32 bytes.
pub fn parse(input: &str) -> Result<ShareLink> {
    let rest = input
        .find(VAULT_SEGMENT)
        .map(|pos| &input[pos + VAULT_SEGMENT.len()..])
        .ok_or_else(|| WalletError::InvalidShareLink { input: input.to_string() })?;

    let mut segments = rest.split('/').filter(|s| !s.is_empty());
    let address_segment = segments.next().ok_or_else(|| WalletError::InvalidShareLink { input: input.to_string() })?;
    if !looks_like_base58_pubkey(address_segment) {
        return Err(WalletError::InvalidShareLink { input: input.to_string() });
    }
    let vault_address: Address = address_segment.parse()?;

    let proposal_index = match (segments.next(), segments.next()) {
        (None, _) => None,
        (Some(PROPOSAL_SEGMENT), Some(index)) => {
            Some(index.parse::<u64>().map_err(|_| WalletError::InvalidShareLink { input: input.to_string() })?)
        }
        _ => return Err(WalletError::InvalidShareLink { input: input.to_string() }),
    };

    Ok(ShareLink { vault_address, proposal_index })
}

/// Import helper: accept either a bare base58 vault address or a share URL.
pub fn parse_address_or_link(input: &str) -> Result<Address> {
    let trimmed = input.trim();
    if looks_like_base58_pubkey(trimmed) {
        return trimmed.parse();
    }
    parse(trimmed).map(|link| link.vault_address)
}
