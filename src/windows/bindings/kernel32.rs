//! Kernel32.dll bindings for process handles

use crate::core::types::{OsError, ProcessId};
use crate::windows::utils::last_os_error;
use winapi::shared::minwindef::FALSE;
use winapi::um::handleapi::CloseHandle;
use winapi::um::processthreadsapi::{GetCurrentProcess, OpenProcess};
use winapi::um::winnt::HANDLE;

/// Pseudo-handle of the calling process; never needs closing
pub fn current_process() -> HANDLE {
    unsafe { GetCurrentProcess() }
}

/// Safe wrapper for OpenProcess
pub fn open_process(pid: ProcessId, desired_access: u32) -> Result<HANDLE, OsError> {
    unsafe {
        let handle = OpenProcess(desired_access, FALSE, pid);
        if handle.is_null() {
            Err(last_os_error(format!("OpenProcess({})", pid)))
        } else {
            Ok(handle)
        }
    }
}

/// Safe wrapper for CloseHandle
///
/// # Safety
/// The handle must be a valid Windows handle
pub unsafe fn close_handle(handle: HANDLE) -> Result<(), OsError> {
    if handle.is_null() {
        return Ok(());
    }

    if CloseHandle(handle) == FALSE {
        Err(last_os_error("CloseHandle"))
    } else {
        Ok(())
    }
}
