//! Owned process and token handles

use crate::core::types::{OsError, TokenTarget};
use crate::windows::bindings::{advapi32, kernel32};
use std::fmt;
use tracing::trace;
use winapi::shared::minwindef::DWORD;
use winapi::um::winnt::{HANDLE, PROCESS_QUERY_LIMITED_INFORMATION};

/// Kernel handle closed on drop
pub struct Handle {
    raw: HANDLE,
}

impl Handle {
    /// Take ownership of a handle returned by an `Open*` call
    pub fn from_raw(raw: HANDLE) -> Self {
        Handle { raw }
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }

    pub fn raw(&self) -> HANDLE {
        self.raw
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        // Nothing useful to do if CloseHandle fails here
        unsafe {
            let _ = kernel32::close_handle(self.raw);
        }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:p})", self.raw)
    }
}

/// Primary token of a [`TokenTarget`], held for the duration of one call
///
/// For another process the process handle is opened with
/// `PROCESS_QUERY_LIMITED_INFORMATION` and closed as soon as the token is
/// open. The current-process pseudo-handle is never closed.
#[derive(Debug)]
pub struct TokenHandle {
    token: Handle,
    target: TokenTarget,
}

impl TokenHandle {
    pub fn open(target: TokenTarget, access: DWORD) -> Result<Self, OsError> {
        let raw = match target {
            TokenTarget::CurrentProcess => {
                advapi32::open_process_token(kernel32::current_process(), access)?
            }
            TokenTarget::Process(pid) => {
                let process = Handle::from_raw(kernel32::open_process(
                    pid,
                    PROCESS_QUERY_LIMITED_INFORMATION,
                )?);
                advapi32::open_process_token(process.raw(), access)?
            }
        };
        trace!(%target, access, "opened token");

        Ok(TokenHandle {
            token: Handle::from_raw(raw),
            target,
        })
    }

    pub fn raw(&self) -> HANDLE {
        self.token.raw()
    }

    pub fn target(&self) -> TokenTarget {
        self.target
    }
}
