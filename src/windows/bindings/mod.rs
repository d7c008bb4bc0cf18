//! Windows API bindings
//!
//! Thin safe wrappers over the system libraries the token backend needs.

pub mod advapi32;
pub mod kernel32;
pub mod secur32;
