use crate::foundation::Result;
use crate::infrastructure::storage::StorageBackend;
use crate::storage_err;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const INDEX_FILE: &str = "index.json";

/// Directory-backed realization: one file per key plus an index file
/// listing live keys. Key names are hex-encoded in file names, so any
/// string key is safe. Writes go through tmp + rename.
pub struct FileBackend {
    dir: PathBuf,
    // Serializes index read-modify-write within this process.
    write_lock: Mutex<()>,
}

impl FileBackend {
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| storage_err!("create storage dir", e))?;
        let backend = Self { dir, write_lock: Mutex::new(()) };
        if !backend.index_path().exists() {
            backend.write_index(&BTreeSet::new()).await?;
        }
        Ok(backend)
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.bin", hex::encode(key.as_bytes())))
    }

    async fn read_index(&self) -> Result<BTreeSet<String>> {
        let bytes = tokio::fs::read(self.index_path()).await.map_err(|e| storage_err!("read index", e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write_index(&self, index: &BTreeSet<String>) -> Result<()> {
        let bytes = serde_json::to_vec(index)?;
        self.write_atomic(&self.index_path(), &bytes).await
    }

    async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(|e| storage_err!("write file", e))?;
        tokio::fs::rename(&tmp, path).await.map_err(|e| storage_err!("rename file", e))?;
        #[cfg(target_family = "unix")]
        Self::set_file_permissions(path)?;
        Ok(())
    }

    #[cfg(target_family = "unix")]
    fn set_file_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path).map_err(|e| storage_err!("stat file", e))?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms).map_err(|e| storage_err!("set file permissions", e))?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    fn backend(&self) -> &'static str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.value_path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_err!("read value", e)),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_atomic(&self.value_path(key), &value).await?;
        let mut index = self.read_index().await?;
        if index.insert(key.to_string()) {
            self.write_index(&index).await?;
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(self.value_path(key)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(storage_err!("remove value", e)),
        }
        let mut index = self.read_index().await?;
        if index.remove(key) {
            self.write_index(&index).await?;
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.read_index().await?.into_iter().collect())
    }
}
