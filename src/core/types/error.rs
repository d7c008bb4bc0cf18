//! Custom error types for winid

use crate::config::ConfigError;
use thiserror::Error;

/// A failed native call, captured right after it returned
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (os error {code})")]
pub struct OsError {
    /// Win32 error code (`GetLastError`)
    pub code: u32,
    /// Human-readable message, prefixed with the failing call
    pub message: String,
}

impl OsError {
    /// Creates a new OS error
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        OsError {
            code,
            message: message.into(),
        }
    }
}

/// Coarse classification of an [`IdentityError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TokenQueryFailed,
    MalformedBuffer,
    NameResolutionFailed,
    SidLookupFailed,
    PrivilegeAdjustmentFailed,
    InvalidSid,
    PrivilegeNotFound,
    UnsupportedPlatform,
    Config,
    Io,
    Json,
}

/// Main error type for identity queries
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Failed to query access token ({query}): {reason}")]
    TokenQueryFailed { query: String, reason: String },

    #[error("Malformed privilege buffer: expected {expected} bytes, got {actual}")]
    MalformedBuffer { expected: usize, actual: usize },

    #[error("Failed to resolve {what} for {key}: {reason}")]
    NameResolutionFailed {
        what: String,
        key: String,
        reason: String,
    },

    #[error("Failed to look up account for SID {sid}: {reason}")]
    SidLookupFailed { sid: String, reason: String },

    #[error("Failed to adjust privilege {privilege}: {reason}")]
    PrivilegeAdjustmentFailed { privilege: String, reason: String },

    #[error("Invalid SID: {0}")]
    InvalidSid(String),

    #[error("Privilege not held by token: {0}")]
    PrivilegeNotFound(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for identity operations
pub type IdentityResult<T> = Result<T, IdentityError>;

impl IdentityError {
    /// Creates a token query error
    pub fn token_query(query: impl Into<String>, reason: impl ToString) -> Self {
        IdentityError::TokenQueryFailed {
            query: query.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a buffer length mismatch error
    pub fn malformed_buffer(expected: usize, actual: usize) -> Self {
        IdentityError::MalformedBuffer { expected, actual }
    }

    /// Creates a name resolution error
    pub fn name_resolution(
        what: impl Into<String>,
        key: impl ToString,
        reason: impl ToString,
    ) -> Self {
        IdentityError::NameResolutionFailed {
            what: what.into(),
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a SID lookup error
    pub fn sid_lookup(sid: impl ToString, reason: impl ToString) -> Self {
        IdentityError::SidLookupFailed {
            sid: sid.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a privilege adjustment error
    pub fn adjustment_failed(privilege: impl Into<String>, reason: impl ToString) -> Self {
        IdentityError::PrivilegeAdjustmentFailed {
            privilege: privilege.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::TokenQueryFailed { .. } => ErrorKind::TokenQueryFailed,
            IdentityError::MalformedBuffer { .. } => ErrorKind::MalformedBuffer,
            IdentityError::NameResolutionFailed { .. } => ErrorKind::NameResolutionFailed,
            IdentityError::SidLookupFailed { .. } => ErrorKind::SidLookupFailed,
            IdentityError::PrivilegeAdjustmentFailed { .. } => {
                ErrorKind::PrivilegeAdjustmentFailed
            }
            IdentityError::InvalidSid(_) => ErrorKind::InvalidSid,
            IdentityError::PrivilegeNotFound(_) => ErrorKind::PrivilegeNotFound,
            IdentityError::UnsupportedPlatform(_) => ErrorKind::UnsupportedPlatform,
            IdentityError::Config(_) => ErrorKind::Config,
            IdentityError::IoError(_) => ErrorKind::Io,
            IdentityError::JsonError(_) => ErrorKind::Json,
        }
    }
}
