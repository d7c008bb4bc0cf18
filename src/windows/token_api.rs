//! Live access-token backend

use crate::core::types::{Luid, OsError, Sid, TokenTarget};
use crate::identity::api::{Account, LookupStatus, PrivilegeAdjust, RawGroup, TokenQuery};
use crate::identity::resolve::{failure_to_os_error, probe_then_fetch};
use crate::windows::bindings::{advapi32, secur32};
use crate::windows::types::TokenHandle;
use crate::windows::utils::{ErrorCode, WinError};
use winapi::um::winnt::{
    TokenGroups, TokenPrivileges, TokenUser, TOKEN_ADJUST_PRIVILEGES, TOKEN_GROUPS, TOKEN_QUERY,
    TOKEN_USER,
};

/// `TokenQuery` and `PrivilegeAdjust` over advapi32/secur32
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsTokenApi;

impl WindowsTokenApi {
    pub fn new() -> Self {
        WindowsTokenApi
    }
}

impl TokenQuery for WindowsTokenApi {
    fn user_name(&self, target: TokenTarget) -> Result<String, OsError> {
        match target {
            TokenTarget::CurrentProcess => {
                probe_then_fetch(secur32::get_user_name_ex).map_err(failure_to_os_error)
            }
            TokenTarget::Process(_) => {
                // GetUserNameExW only reports the calling thread
                let sid = self.user_sid(target)?;
                match self.lookup_account(&sid)? {
                    Some(account) if account.domain.is_empty() => Ok(account.name),
                    Some(account) => Ok(format!("{}\\{}", account.domain, account.name)),
                    None => Err(WinError::with_code(ErrorCode::NoneMapped, sid.to_string())
                        .to_os_error()),
                }
            }
        }
    }

    fn user_sid(&self, target: TokenTarget) -> Result<Sid, OsError> {
        let token = TokenHandle::open(target, TOKEN_QUERY)?;
        let buffer = advapi32::get_token_information(token.raw(), TokenUser)?;
        unsafe {
            let user = buffer.as_struct::<TOKEN_USER>();
            advapi32::copy_sid(user.User.Sid)
        }
    }

    fn token_groups(&self, target: TokenTarget) -> Result<Vec<RawGroup>, OsError> {
        let token = TokenHandle::open(target, TOKEN_QUERY)?;
        let buffer = advapi32::get_token_information(token.raw(), TokenGroups)?;
        unsafe {
            let groups = buffer.as_struct::<TOKEN_GROUPS>();
            let entries =
                std::slice::from_raw_parts(groups.Groups.as_ptr(), groups.GroupCount as usize);
            entries
                .iter()
                .map(|entry| -> Result<RawGroup, OsError> {
                    Ok(RawGroup::new(advapi32::copy_sid(entry.Sid)?, entry.Attributes))
                })
                .collect()
        }
    }

    fn token_privileges(&self, target: TokenTarget) -> Result<Vec<u8>, OsError> {
        let token = TokenHandle::open(target, TOKEN_QUERY)?;
        let buffer = advapi32::get_token_information(token.raw(), TokenPrivileges)?;
        Ok(buffer.as_bytes().to_vec())
    }

    fn lookup_account(&self, sid: &Sid) -> Result<Option<Account>, OsError> {
        advapi32::lookup_account_sid(sid)
    }

    fn lookup_privilege_name(&self, luid: Luid, buf: &mut [u16]) -> LookupStatus {
        advapi32::lookup_privilege_name(luid, buf)
    }

    fn lookup_privilege_display_name(&self, name: &str, buf: &mut [u16]) -> LookupStatus {
        advapi32::lookup_privilege_display_name(name, buf)
    }
}

impl PrivilegeAdjust for WindowsTokenApi {
    fn adjust_privilege(
        &self,
        target: TokenTarget,
        luid: Luid,
        attributes: u32,
    ) -> Result<(), OsError> {
        let token = TokenHandle::open(target, TOKEN_ADJUST_PRIVILEGES | TOKEN_QUERY)?;
        advapi32::adjust_token_privilege(token.raw(), luid, attributes)
    }
}
