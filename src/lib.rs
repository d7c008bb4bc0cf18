//! winid: Windows access-token identity decoding with whoami-style reports

pub mod config;
pub mod core;
pub mod identity;
pub mod windows;

// Re-export main types from core module
pub use crate::core::types::{
    ErrorKind, IdentityError, IdentityResult, Luid, OsError, ProcessId, Sid, TokenTarget,
};

pub use crate::identity::{
    AccountType, Group, Identity, Privilege, PrivilegeAdjust, RawGroup, TokenQuery,
};

// Re-export core directly for full access
pub use crate::core::*;

#[cfg(windows)]
pub use crate::windows::WindowsTokenApi;

/// Query the live token of `target` (`None` for the current process)
#[cfg(windows)]
pub fn identity(target: Option<TokenTarget>) -> IdentityResult<Identity> {
    Identity::query(&WindowsTokenApi::new(), target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(AUTHORS, env!("CARGO_PKG_AUTHORS"));
    }

    #[test]
    fn test_sid_reexport() {
        let sid: Sid = "S-1-5-32-544".parse().unwrap();
        assert_eq!(sid.rid(), Some(544));
        assert_eq!(sid.to_string(), "S-1-5-32-544");
    }

    #[test]
    fn test_luid_reexport() {
        let luid = Luid::new(0x13);
        assert_eq!(luid.low_part(), 0x13);
        assert_eq!(luid.high_part(), 0);
    }

    #[test]
    fn test_token_target_reexport() {
        assert_eq!(TokenTarget::default(), TokenTarget::CurrentProcess);
        let pid: ProcessId = 4;
        assert_eq!(TokenTarget::Process(pid).to_string(), "process 4");
    }

    #[test]
    fn test_error_reexport() {
        let err = IdentityError::PrivilegeNotFound("SeDebugPrivilege".to_string());
        assert_eq!(err.kind(), ErrorKind::PrivilegeNotFound);
        let result: IdentityResult<()> = Err(err);
        assert!(result.is_err());
    }
}
