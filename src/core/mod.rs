//! Core module containing fundamental types for winid
//!
//! This module provides the building blocks used throughout the crate:
//! LUIDs, SIDs, token selection and the error taxonomy.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    ErrorKind, IdentityError, IdentityResult, Luid, OsError, ProcessId, Sid, TokenTarget,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
