//! Windowed proposal reads. Proposal count is unbounded and indices are
//! monotonic, so fetches are capped at the newest `window` indices instead
//! of walking the full history.

use crate::domain::proposal::{pending_count, Proposal};
use crate::domain::Vault;
use crate::foundation::Result;
use crate::infrastructure::chain::decode::decode_proposal;
use crate::infrastructure::chain::ChainReader;

pub const DEFAULT_RECENT_WINDOW: u64 = 20;

/// Fetch the most recent `window` proposals, newest first. Indices with no
/// account yet (submitted but unconfirmed, or pruned) are skipped.
pub async fn list_recent(vault: &Vault, reader: &dyn ChainReader, window: u64) -> Result<Vec<Proposal>> {
    let newest = vault.transaction_index;
    if newest == 0 || window == 0 {
        return Ok(Vec::new());
    }
    let oldest = newest.saturating_sub(window - 1).max(1);

    let mut proposals = Vec::new();
    for index in (oldest..=newest).rev() {
        let Some(account) = reader.get_proposal_account(&vault.address, index).await? else {
            continue;
        };
        let mut proposal = decode_proposal(&account)?;
        proposal.resolve(vault.threshold, vault.voter_count());
        proposals.push(proposal);
    }
    Ok(proposals)
}

/// Badge count over the recent window: Active plus Approved, since an
/// Approved proposal still needs a human to execute it.
pub async fn pending_badge(vault: &Vault, reader: &dyn ChainReader, window: u64) -> Result<usize> {
    Ok(pending_count(&list_recent(vault, reader, window).await?))
}
