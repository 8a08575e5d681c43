mod discovery;
mod keystore_lifecycle;
mod proposal_flow;
