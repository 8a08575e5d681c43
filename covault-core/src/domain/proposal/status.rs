use crate::foundation::{Result, WalletError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical lifecycle of a proposal. The on-chain program owns the real
/// transitions; this model classifies fetched state and predicts what the
/// program will accept.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum ProposalStatus {
    Draft,
    Active,
    Approved,
    Rejected,
    Executed,
    Cancelled,
}

const VALID_TRANSITIONS: &[(ProposalStatus, ProposalStatus)] = &[
    (ProposalStatus::Draft, ProposalStatus::Active),
    (ProposalStatus::Draft, ProposalStatus::Cancelled),
    (ProposalStatus::Active, ProposalStatus::Approved),
    (ProposalStatus::Active, ProposalStatus::Rejected),
    (ProposalStatus::Active, ProposalStatus::Cancelled),
    (ProposalStatus::Approved, ProposalStatus::Executed),
];

impl ProposalStatus {
    /// Map the chain's raw status tag. Unrecognized tags are an error,
    /// never a silent default.
    pub fn classify(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "executed" => Ok(Self::Executed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(WalletError::UnknownStatus(raw.to_string())),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Executed | Self::Rejected | Self::Cancelled)
    }

    pub fn can_transition_to(&self, next: Self) -> bool {
        *self == next || VALID_TRANSITIONS.contains(&(*self, next))
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Draft => "Draft",
            Self::Active => "Active",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Executed => "Executed",
            Self::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}
