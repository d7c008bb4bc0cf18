//! Windows API layer for token queries
//!
//! All unsafe FFI calls live under this module. Only the error-code and
//! string helpers are built on other hosts.

pub mod utils;

#[cfg(windows)]
pub mod bindings;
#[cfg(windows)]
pub mod token_api;
#[cfg(windows)]
pub mod types;

pub use utils::{ErrorCode, WinError};

#[cfg(windows)]
pub use token_api::WindowsTokenApi;
#[cfg(windows)]
pub use types::{Handle, TokenHandle};

/// Whether this build can talk to a live access token
pub fn is_supported_platform() -> bool {
    cfg!(windows)
}
