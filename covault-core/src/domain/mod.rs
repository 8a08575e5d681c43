pub mod model;
pub mod permission;
pub mod proposal;
pub mod share_link;

pub use model::{Vault, VaultReference};
pub use permission::{validate_members, validate_threshold, Capabilities, Member, MemberWarning};
pub use proposal::{pending_count, Proposal, ProposalStatus, VoteKind};
