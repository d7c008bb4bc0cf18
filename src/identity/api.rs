//! Native capabilities consumed by the identity decoders
//!
//! The decoders never call the OS directly. They are handed an
//! implementation of these traits: `WindowsTokenApi` on Windows, or an
//! in-memory fake in tests.

use crate::core::types::{Luid, OsError, Sid, TokenTarget};

/// Outcome of a single call into a string-returning native lookup
///
/// `Ok(n)` means `n` UTF-16 units were written to the caller's buffer.
pub type LookupStatus = Result<usize, LookupFailure>;

/// Why a native lookup did not produce a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    /// Buffer too small; carries the required length in UTF-16 units
    InsufficientBuffer(usize),
    /// Any other failure
    Os(OsError),
}

/// One `{SID, attributes}` entry from the token's group list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGroup {
    pub sid: Sid,
    pub attributes: u32,
}

impl RawGroup {
    pub fn new(sid: Sid, attributes: u32) -> Self {
        RawGroup { sid, attributes }
    }
}

/// Result of resolving a SID to an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub domain: String,
    /// Raw `SID_NAME_USE` code
    pub use_code: u32,
}

impl Account {
    pub fn new(name: impl Into<String>, domain: impl Into<String>, use_code: u32) -> Self {
        Account {
            name: name.into(),
            domain: domain.into(),
            use_code,
        }
    }
}

/// Read-only queries against an access token and the local account database
pub trait TokenQuery {
    /// SAM-compatible `DOMAIN\user` name of the token's user
    fn user_name(&self, target: TokenTarget) -> Result<String, OsError>;

    /// SID of the token's user
    fn user_sid(&self, target: TokenTarget) -> Result<Sid, OsError>;

    /// Group memberships, in the order the OS reports them
    fn token_groups(&self, target: TokenTarget) -> Result<Vec<RawGroup>, OsError>;

    /// Raw `TOKEN_PRIVILEGES` buffer
    fn token_privileges(&self, target: TokenTarget) -> Result<Vec<u8>, OsError>;

    /// Resolve a SID to an account; `Ok(None)` when the SID has no mapping
    fn lookup_account(&self, sid: &Sid) -> Result<Option<Account>, OsError>;

    /// Write the programmatic name of `luid` into `buf`
    fn lookup_privilege_name(&self, luid: Luid, buf: &mut [u16]) -> LookupStatus;

    /// Write the display name of privilege `name` into `buf`
    fn lookup_privilege_display_name(&self, name: &str, buf: &mut [u16]) -> LookupStatus;
}

/// Pushes privilege attribute changes to a live token
pub trait PrivilegeAdjust {
    /// Apply exactly one `{luid, attributes}` record to the target's token
    fn adjust_privilege(
        &self,
        target: TokenTarget,
        luid: Luid,
        attributes: u32,
    ) -> Result<(), OsError>;
}
