//! Secur32.dll bindings for the calling thread's user name

use crate::identity::api::{LookupFailure, LookupStatus};
use crate::windows::utils::{last_os_error, ErrorCode};
use ::windows::core::PWSTR;
use ::windows::Win32::Security::Authentication::Identity::{GetUserNameExW, NameSamCompatible};
use std::ptr;

/// One call to GetUserNameExW in `DOMAIN\user` form
///
/// On `ERROR_MORE_DATA` the required length (terminator included) is
/// reported back through `InsufficientBuffer`.
pub fn get_user_name_ex(buf: &mut [u16]) -> LookupStatus {
    let mut size = buf.len() as u32;
    let out = if buf.is_empty() {
        ptr::null_mut()
    } else {
        buf.as_mut_ptr()
    };

    let ok = unsafe { GetUserNameExW(NameSamCompatible, PWSTR(out), &mut size) };
    if ok.0 != 0 {
        return Ok(size as usize);
    }

    if ErrorCode::last_error().is_buffer_too_small() {
        Err(LookupFailure::InsufficientBuffer(size as usize))
    } else {
        Err(LookupFailure::Os(last_os_error("GetUserNameExW")))
    }
}
