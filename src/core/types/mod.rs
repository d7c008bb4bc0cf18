//! Core type definitions for winid
//!
//! This module contains the fundamental value types shared by the decoders,
//! the Windows backend and the CLI: identifiers, token selection and errors.

mod error;
mod luid;
mod sid;
mod target;

// Re-export all public types
pub use error::{ErrorKind, IdentityError, IdentityResult, OsError};
pub use luid::Luid;
pub use sid::{Sid, SID_MAX_SUB_AUTHORITIES};
pub use target::TokenTarget;

// Common type aliases
pub type ProcessId = u32;
