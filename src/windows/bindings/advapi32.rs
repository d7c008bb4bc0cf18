//! Advapi32.dll bindings for token queries, account and privilege lookups

use crate::core::types::{Luid, OsError, Sid};
use crate::identity::api::{Account, LookupFailure, LookupStatus};
use crate::windows::utils::{last_os_error, string_to_wide, wide_to_string, ErrorCode, WinError};
use std::{mem, ptr};
use winapi::ctypes::c_void;
use winapi::shared::minwindef::{DWORD, FALSE};
use winapi::um::processthreadsapi::OpenProcessToken;
use winapi::um::securitybaseapi::{AdjustTokenPrivileges, GetLengthSid, GetTokenInformation};
use winapi::um::winbase::{LookupAccountSidW, LookupPrivilegeNameW};
use winapi::um::winnt::{
    HANDLE, LUID, LUID_AND_ATTRIBUTES, PSID, SID_NAME_USE, TOKEN_INFORMATION_CLASS,
    TOKEN_PRIVILEGES,
};

/// 8-byte aligned copy of a `GetTokenInformation` result
pub struct TokenBuffer {
    words: Vec<u64>,
    len: usize,
}

impl TokenBuffer {
    fn with_len(len: usize) -> Self {
        TokenBuffer {
            words: vec![0u64; len.div_ceil(8)],
            len,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.words.as_ptr() as *const u8, self.len) }
    }

    /// View the start of the buffer as a native struct
    ///
    /// # Safety
    /// The buffer must hold a valid `T` as written by `GetTokenInformation`.
    pub unsafe fn as_struct<T>(&self) -> &T {
        &*(self.words.as_ptr() as *const T)
    }

    fn as_mut_ptr(&mut self) -> *mut c_void {
        self.words.as_mut_ptr() as *mut c_void
    }
}

/// Safe wrapper for OpenProcessToken
pub fn open_process_token(process: HANDLE, access: DWORD) -> Result<HANDLE, OsError> {
    unsafe {
        let mut token: HANDLE = ptr::null_mut();
        if OpenProcessToken(process, access, &mut token) == FALSE {
            return Err(last_os_error("OpenProcessToken"));
        }
        Ok(token)
    }
}

/// Query one token information class, probing for the required size first
pub fn get_token_information(
    token: HANDLE,
    class: TOKEN_INFORMATION_CLASS,
) -> Result<TokenBuffer, OsError> {
    unsafe {
        let mut size: DWORD = 0;
        if GetTokenInformation(token, class, ptr::null_mut(), 0, &mut size) == FALSE {
            let code = ErrorCode::last_error();
            if !code.is_buffer_too_small() {
                return Err(last_os_error("GetTokenInformation"));
            }
        }
        if size == 0 {
            return Err(OsError::new(0, "GetTokenInformation: reported zero length"));
        }

        let mut buffer = TokenBuffer::with_len(size as usize);
        if GetTokenInformation(token, class, buffer.as_mut_ptr(), size, &mut size) == FALSE {
            return Err(last_os_error("GetTokenInformation"));
        }
        buffer.len = (size as usize).min(buffer.words.len() * 8);
        Ok(buffer)
    }
}

/// Copy the SID behind a native pointer
///
/// # Safety
/// `psid` must point to a valid SID.
pub unsafe fn copy_sid(psid: PSID) -> Result<Sid, OsError> {
    let len = GetLengthSid(psid) as usize;
    let bytes = std::slice::from_raw_parts(psid as *const u8, len);
    Sid::from_bytes(bytes).map_err(|e| OsError::new(0, e.to_string()))
}

fn lookup_status(ok: bool, written: DWORD, call: &str) -> LookupStatus {
    if ok {
        return Ok(written as usize);
    }
    let code = ErrorCode::last_error();
    if code.is_buffer_too_small() {
        Err(LookupFailure::InsufficientBuffer(written as usize))
    } else {
        Err(LookupFailure::Os(last_os_error(call)))
    }
}

fn out_ptr(buf: &mut [u16]) -> *mut u16 {
    if buf.is_empty() {
        ptr::null_mut()
    } else {
        buf.as_mut_ptr()
    }
}

/// One call to LookupPrivilegeNameW on the local system
pub fn lookup_privilege_name(luid: Luid, buf: &mut [u16]) -> LookupStatus {
    let mut raw = LUID {
        LowPart: luid.low_part(),
        HighPart: luid.high_part(),
    };
    let mut cch = buf.len() as DWORD;
    let ok = unsafe { LookupPrivilegeNameW(ptr::null(), &mut raw, out_ptr(buf), &mut cch) };
    lookup_status(ok != FALSE, cch, "LookupPrivilegeNameW")
}

/// One call to LookupPrivilegeDisplayNameW on the local system
pub fn lookup_privilege_display_name(name: &str, buf: &mut [u16]) -> LookupStatus {
    use ::windows::core::{PCWSTR, PWSTR};
    use ::windows::Win32::Security::LookupPrivilegeDisplayNameW;

    let wide_name = string_to_wide(name);
    let mut cch = buf.len() as u32;
    let mut language = 0u32;
    let result = unsafe {
        LookupPrivilegeDisplayNameW(
            PCWSTR::null(),
            PCWSTR(wide_name.as_ptr()),
            PWSTR(out_ptr(buf)),
            &mut cch,
            &mut language,
        )
    };
    match result {
        Ok(()) => Ok(cch as usize),
        Err(err) => {
            let code = ErrorCode::from(&err);
            if code.is_buffer_too_small() {
                Err(LookupFailure::InsufficientBuffer(cch as usize))
            } else {
                Err(LookupFailure::Os(
                    WinError::with_code(code, "LookupPrivilegeDisplayNameW").to_os_error(),
                ))
            }
        }
    }
}

/// Resolve a SID to account, domain and `SID_NAME_USE`
///
/// Returns `Ok(None)` when the system has no mapping for the SID.
pub fn lookup_account_sid(sid: &Sid) -> Result<Option<Account>, OsError> {
    let psid = sid.as_bytes().as_ptr() as PSID;
    let mut name_len: DWORD = 0;
    let mut domain_len: DWORD = 0;
    let mut use_type: SID_NAME_USE = 0;

    unsafe {
        // Probe: expected to fail with ERROR_INSUFFICIENT_BUFFER
        if LookupAccountSidW(
            ptr::null(),
            psid,
            ptr::null_mut(),
            &mut name_len,
            ptr::null_mut(),
            &mut domain_len,
            &mut use_type,
        ) == FALSE
        {
            match ErrorCode::last_error() {
                ErrorCode::NoneMapped => return Ok(None),
                code if code.is_buffer_too_small() => {}
                _ => return Err(last_os_error("LookupAccountSidW")),
            }
        }

        let mut name = vec![0u16; name_len as usize];
        let mut domain = vec![0u16; domain_len as usize];
        if LookupAccountSidW(
            ptr::null(),
            psid,
            out_ptr(&mut name),
            &mut name_len,
            out_ptr(&mut domain),
            &mut domain_len,
            &mut use_type,
        ) == FALSE
        {
            return match ErrorCode::last_error() {
                ErrorCode::NoneMapped => Ok(None),
                _ => Err(last_os_error("LookupAccountSidW")),
            };
        }

        Ok(Some(Account::new(
            wide_to_string(&name[..(name_len as usize).min(name.len())]),
            wide_to_string(&domain[..(domain_len as usize).min(domain.len())]),
            use_type as u32,
        )))
    }
}

/// Apply one `{luid, attributes}` record with AdjustTokenPrivileges
///
/// The token must be opened with `TOKEN_ADJUST_PRIVILEGES`.
pub fn adjust_token_privilege(token: HANDLE, luid: Luid, attributes: u32) -> Result<(), OsError> {
    let mut privileges = TOKEN_PRIVILEGES {
        PrivilegeCount: 1,
        Privileges: [LUID_AND_ATTRIBUTES {
            Luid: LUID {
                LowPart: luid.low_part(),
                HighPart: luid.high_part(),
            },
            Attributes: attributes,
        }],
    };

    unsafe {
        if AdjustTokenPrivileges(
            token,
            FALSE,
            &mut privileges,
            mem::size_of::<TOKEN_PRIVILEGES>() as DWORD,
            ptr::null_mut(),
            ptr::null_mut(),
        ) == FALSE
        {
            return Err(last_os_error("AdjustTokenPrivileges"));
        }
    }

    // Succeeds even when the token does not hold the privilege
    if ErrorCode::last_error() == ErrorCode::NotAllAssigned {
        return Err(last_os_error("AdjustTokenPrivileges"));
    }
    Ok(())
}
