use crate::foundation::Result;
use async_trait::async_trait;

/// Flat key-value persistence for the keystore and the vault registry.
/// Both realizations (in-memory mirror, file directory with an index)
/// satisfy the same contract; callers are agnostic to which is used.
/// Concurrent writers from multiple processes are not coordinated: last
/// writer wins.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// A short backend name (e.g. `"memory"`, `"file"`).
    fn backend(&self) -> &'static str {
        "unknown"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Removing an absent key is a no-op.
    async fn remove(&self, key: &str) -> Result<()>;

    async fn list(&self) -> Result<Vec<String>>;
}
