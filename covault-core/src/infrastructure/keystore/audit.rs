//! Audit trail for keystore lifecycle and secret egress. Events never
//! contain secret material, only addresses and outcomes.

use crate::foundation::{now_nanos, Result, WalletError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum KeystoreOperation {
    Created,
    Unlocked,
    Exported,
    Deleted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result")]
pub enum OperationResult {
    Success,
    Failure { error: String },
}

impl OperationResult {
    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(e) => Self::Failure { error: e.to_string() },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreEvent {
    pub timestamp_nanos: u64,
    pub operation: KeystoreOperation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_address: Option<String>,
    pub result: OperationResult,
}

impl KeystoreEvent {
    pub fn new(operation: KeystoreOperation, public_address: Option<String>, result: OperationResult) -> Self {
        Self { timestamp_nanos: now_nanos(), operation, public_address, result }
    }
}

pub trait KeystoreAuditLogger: Send + Sync {
    fn log(&self, event: KeystoreEvent) -> Result<()>;
}

pub struct NoopAuditLogger;

impl KeystoreAuditLogger for NoopAuditLogger {
    fn log(&self, _event: KeystoreEvent) -> Result<()> {
        Ok(())
    }
}

/// JSON-lines audit file, append-only.
pub struct FileAuditLogger {
    file: Arc<std::sync::Mutex<std::fs::File>>,
}

impl FileAuditLogger {
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .map_err(|e| WalletError::AuditLogError { details: format!("failed to open audit log: {e}") })?;
        Ok(Self { file: Arc::new(std::sync::Mutex::new(file)) })
    }
}

impl KeystoreAuditLogger for FileAuditLogger {
    fn log(&self, event: KeystoreEvent) -> Result<()> {
        use std::io::Write;

        let json = serde_json::to_string(&event)
            .map_err(|e| WalletError::AuditLogError { details: format!("failed to serialize audit event: {e}") })?;
        let mut file =
            self.file.lock().map_err(|_| WalletError::AuditLogError { details: "audit log lock poisoned".to_string() })?;
        writeln!(file, "{json}").map_err(|e| WalletError::AuditLogError { details: format!("failed to write audit event: {e}") })?;
        file.flush().map_err(|e| WalletError::AuditLogError { details: format!("failed to flush audit log: {e}") })?;
        Ok(())
    }
}
