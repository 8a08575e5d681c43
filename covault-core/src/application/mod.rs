pub mod proposals;
pub mod registry;
pub mod service;

pub use registry::VaultRegistry;
pub use service::VaultService;
