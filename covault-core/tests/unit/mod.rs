mod domain_permission;
mod domain_proposal;
