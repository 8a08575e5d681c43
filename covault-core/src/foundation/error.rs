use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidAddress,
    AmountNotPositive,
    WeakPassword,
    InvalidShareLink,
    ConfigError,
    InvalidPassword,
    NotAMember,
    PermissionDenied,
    InvalidThreshold,
    DuplicateMember,
    IdentityAlreadyExists,
    IdentityNotFound,
    VaultNotFound,
    ProposalNotFound,
    ProposalNotActionable,
    AlreadyVoted,
    ChainUnavailable,
    SubmissionFailed,
    StorageError,
    CorruptedIdentity,
    AuthenticationFailed,
    MalformedBlob,
    UnknownStatus,
    SerializationError,
    CryptoError,
    AuditLogError,
    Message,
}

/// Coarse failure taxonomy. Input errors are rejected before any I/O,
/// Availability errors may be transient and are retry-at-caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Input,
    Authorization,
    State,
    Availability,
    Integrity,
}

/// Structured failure handed to front ends: machine-readable code + class,
/// human-readable message. CLI callers map any of these to a non-zero exit.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub class: ErrorClass,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("invalid address {input}: {reason}")]
    InvalidAddress { input: String, reason: String },

    #[error("amount must be greater than zero lamports")]
    AmountNotPositive,

    #[error("password too short: minimum {min_len} characters")]
    WeakPassword { min_len: usize },

    #[error("not a recognized vault address or share link: {input}")]
    InvalidShareLink { input: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("invalid password")]
    InvalidPassword,

    #[error("{member} is not a member of vault {vault}")]
    NotAMember { vault: String, member: String },

    #[error("member {member} lacks the {capability} permission")]
    PermissionDenied { member: String, capability: String },

    #[error("invalid threshold {threshold}: must be between 1 and {voters} voting members")]
    InvalidThreshold { threshold: u16, voters: usize },

    #[error("duplicate member address: {0}")]
    DuplicateMember(String),

    #[error("an identity already exists; delete it explicitly before creating another")]
    IdentityAlreadyExists,

    #[error("no identity found in this keystore")]
    IdentityNotFound,

    #[error("vault not found: {0}")]
    VaultNotFound(String),

    #[error("proposal #{index} not found in vault {vault}")]
    ProposalNotFound { vault: String, index: u64 },

    #[error("proposal #{index} is {current}, action requires {required}")]
    ProposalNotActionable { index: u64, current: String, required: String },

    #[error("member {member} has already voted on proposal #{index}")]
    AlreadyVoted { member: String, index: u64 },

    #[error("chain unavailable during {operation}: {details}")]
    ChainUnavailable { operation: String, details: String },

    #[error("transaction {signature} failed to confirm: {reason}")]
    SubmissionFailed { signature: String, reason: String },

    #[error("storage error during {operation}: {details}")]
    StorageError { operation: String, details: String },

    #[error("identity blob authenticated but contents are not a valid keypair: {details}")]
    CorruptedIdentity { details: String },

    #[error("decryption failed: wrong password or corrupted data")]
    AuthenticationFailed,

    #[error("malformed encrypted blob: {details}")]
    MalformedBlob { details: String },

    #[error("unrecognized proposal status tag: {0}")]
    UnknownStatus(String),

    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },

    #[error("crypto error during {operation}: {details}")]
    CryptoError { operation: String, details: String },

    #[error("audit log error: {details}")]
    AuditLogError { details: String },

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, WalletError>;

impl WalletError {
    pub fn code(&self) -> ErrorCode {
        match self {
            WalletError::InvalidAddress { .. } => ErrorCode::InvalidAddress,
            WalletError::AmountNotPositive => ErrorCode::AmountNotPositive,
            WalletError::WeakPassword { .. } => ErrorCode::WeakPassword,
            WalletError::InvalidShareLink { .. } => ErrorCode::InvalidShareLink,
            WalletError::ConfigError(_) => ErrorCode::ConfigError,
            WalletError::InvalidPassword => ErrorCode::InvalidPassword,
            WalletError::NotAMember { .. } => ErrorCode::NotAMember,
            WalletError::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            WalletError::InvalidThreshold { .. } => ErrorCode::InvalidThreshold,
            WalletError::DuplicateMember(_) => ErrorCode::DuplicateMember,
            WalletError::IdentityAlreadyExists => ErrorCode::IdentityAlreadyExists,
            WalletError::IdentityNotFound => ErrorCode::IdentityNotFound,
            WalletError::VaultNotFound(_) => ErrorCode::VaultNotFound,
            WalletError::ProposalNotFound { .. } => ErrorCode::ProposalNotFound,
            WalletError::ProposalNotActionable { .. } => ErrorCode::ProposalNotActionable,
            WalletError::AlreadyVoted { .. } => ErrorCode::AlreadyVoted,
            WalletError::ChainUnavailable { .. } => ErrorCode::ChainUnavailable,
            WalletError::SubmissionFailed { .. } => ErrorCode::SubmissionFailed,
            WalletError::StorageError { .. } => ErrorCode::StorageError,
            WalletError::CorruptedIdentity { .. } => ErrorCode::CorruptedIdentity,
            WalletError::AuthenticationFailed => ErrorCode::AuthenticationFailed,
            WalletError::MalformedBlob { .. } => ErrorCode::MalformedBlob,
            WalletError::UnknownStatus(_) => ErrorCode::UnknownStatus,
            WalletError::SerializationError { .. } => ErrorCode::SerializationError,
            WalletError::CryptoError { .. } => ErrorCode::CryptoError,
            WalletError::AuditLogError { .. } => ErrorCode::AuditLogError,
            WalletError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self.code() {
            ErrorCode::InvalidAddress
            | ErrorCode::AmountNotPositive
            | ErrorCode::WeakPassword
            | ErrorCode::InvalidShareLink
            | ErrorCode::ConfigError => ErrorClass::Input,
            ErrorCode::InvalidPassword
            | ErrorCode::NotAMember
            | ErrorCode::PermissionDenied
            | ErrorCode::InvalidThreshold
            | ErrorCode::DuplicateMember => ErrorClass::Authorization,
            ErrorCode::IdentityAlreadyExists
            | ErrorCode::IdentityNotFound
            | ErrorCode::VaultNotFound
            | ErrorCode::ProposalNotFound
            | ErrorCode::ProposalNotActionable
            | ErrorCode::AlreadyVoted => ErrorClass::State,
            ErrorCode::ChainUnavailable | ErrorCode::SubmissionFailed | ErrorCode::StorageError => ErrorClass::Availability,
            ErrorCode::CorruptedIdentity
            | ErrorCode::AuthenticationFailed
            | ErrorCode::MalformedBlob
            | ErrorCode::UnknownStatus
            | ErrorCode::SerializationError
            | ErrorCode::CryptoError
            | ErrorCode::AuditLogError
            | ErrorCode::Message => ErrorClass::Integrity,
        }
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext { code: self.code(), class: self.class(), message: self.to_string() }
    }

    pub fn invalid_address(input: impl Into<String>, reason: impl Into<String>) -> Self {
        WalletError::InvalidAddress { input: input.into(), reason: reason.into() }
    }

    pub fn chain_unavailable(operation: impl Into<String>, details: impl Into<String>) -> Self {
        WalletError::ChainUnavailable { operation: operation.into(), details: details.into() }
    }

    pub fn malformed_blob(details: impl Into<String>) -> Self {
        WalletError::MalformedBlob { details: details.into() }
    }

    pub fn permission_denied(member: impl Into<String>, capability: impl Into<String>) -> Self {
        WalletError::PermissionDenied { member: member.into(), capability: capability.into() }
    }
}

impl From<io::Error> for WalletError {
    fn from(err: io::Error) -> Self {
        WalletError::StorageError { operation: "io".to_string(), details: err.to_string() }
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::SerializationError { format: "json".to_string(), details: err.to_string() }
    }
}

#[macro_export]
macro_rules! storage_err {
    ($op:expr, $err:expr) => {
        $crate::foundation::WalletError::StorageError { operation: $op.into(), details: $err.to_string() }
    };
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `WalletError` variants at the call site to preserve context.
