//! Windows error code handling utilities

use crate::core::types::OsError;
use std::fmt;

/// Windows error codes the token backend distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success,
    AccessDenied,
    InvalidHandle,
    InvalidParameter,
    InsufficientBuffer,
    MoreData,
    NotAllAssigned,
    NoSuchPrivilege,
    NoneMapped,
    Unknown(u32),
}

impl From<u32> for ErrorCode {
    fn from(code: u32) -> Self {
        match code {
            0 => ErrorCode::Success,
            5 => ErrorCode::AccessDenied,
            6 => ErrorCode::InvalidHandle,
            87 => ErrorCode::InvalidParameter,
            122 => ErrorCode::InsufficientBuffer,
            234 => ErrorCode::MoreData,
            1300 => ErrorCode::NotAllAssigned,
            1313 => ErrorCode::NoSuchPrivilege,
            1332 => ErrorCode::NoneMapped,
            _ => ErrorCode::Unknown(code),
        }
    }
}

impl ErrorCode {
    /// Numeric Win32 code
    pub fn code(&self) -> u32 {
        match self {
            ErrorCode::Success => 0,
            ErrorCode::AccessDenied => 5,
            ErrorCode::InvalidHandle => 6,
            ErrorCode::InvalidParameter => 87,
            ErrorCode::InsufficientBuffer => 122,
            ErrorCode::MoreData => 234,
            ErrorCode::NotAllAssigned => 1300,
            ErrorCode::NoSuchPrivilege => 1313,
            ErrorCode::NoneMapped => 1332,
            ErrorCode::Unknown(code) => *code,
        }
    }

    /// Whether the call failed only because the output buffer was too small
    pub fn is_buffer_too_small(&self) -> bool {
        matches!(self, ErrorCode::InsufficientBuffer | ErrorCode::MoreData)
    }

    /// Recover the Win32 code from an `HRESULT`
    ///
    /// Only `FACILITY_WIN32` results (`0x8007xxxx`) carry one; anything else
    /// is kept whole as `Unknown`.
    pub fn from_hresult(hr: i32) -> Self {
        let hr = hr as u32;
        if hr == 0 {
            ErrorCode::Success
        } else if hr & 0xffff_0000 == 0x8007_0000 {
            ErrorCode::from(hr & 0xffff)
        } else {
            ErrorCode::Unknown(hr)
        }
    }

    /// Get the last Windows error
    #[cfg(windows)]
    pub fn last_error() -> Self {
        unsafe { ErrorCode::from(winapi::um::errhandlingapi::GetLastError()) }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Success => write!(f, "Success"),
            ErrorCode::AccessDenied => write!(f, "Access denied"),
            ErrorCode::InvalidHandle => write!(f, "Invalid handle"),
            ErrorCode::InvalidParameter => write!(f, "Invalid parameter"),
            ErrorCode::InsufficientBuffer => write!(f, "Insufficient buffer"),
            ErrorCode::MoreData => write!(f, "More data is available"),
            ErrorCode::NotAllAssigned => write!(f, "Not all privileges were assigned"),
            ErrorCode::NoSuchPrivilege => write!(f, "No such privilege"),
            ErrorCode::NoneMapped => write!(f, "No mapping between account names and SIDs"),
            ErrorCode::Unknown(code) => write!(f, "Unknown error: {}", code),
        }
    }
}

#[cfg(windows)]
impl From<&::windows::core::Error> for ErrorCode {
    fn from(err: &::windows::core::Error) -> Self {
        ErrorCode::from_hresult(err.code().0)
    }
}

/// Windows error wrapper
pub struct WinError {
    code: ErrorCode,
    context: String,
}

impl WinError {
    /// Capture the last Windows error with context
    #[cfg(windows)]
    pub fn new(context: impl Into<String>) -> Self {
        WinError {
            code: ErrorCode::last_error(),
            context: context.into(),
        }
    }

    /// Create with specific error code
    pub fn with_code(code: ErrorCode, context: impl Into<String>) -> Self {
        WinError {
            code,
            context: context.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Convert to OsError, preferring the system message for the code
    pub fn to_os_error(self) -> OsError {
        OsError::new(
            self.code.code(),
            format!("{}: {}", self.context, system_message(self.code)),
        )
    }
}

#[cfg(windows)]
fn system_message(code: ErrorCode) -> String {
    let err = ::windows::core::Error::from(::windows::core::HRESULT::from_win32(code.code()));
    let message = err.message().to_string();
    let message = message.trim_end();
    if message.is_empty() {
        code.to_string()
    } else {
        message.to_string()
    }
}

#[cfg(not(windows))]
fn system_message(code: ErrorCode) -> String {
    code.to_string()
}

/// Get last Windows error as OsError
#[cfg(windows)]
pub fn last_os_error(context: impl Into<String>) -> OsError {
    WinError::new(context).to_os_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_conversion() {
        assert_eq!(ErrorCode::from(0), ErrorCode::Success);
        assert_eq!(ErrorCode::from(122), ErrorCode::InsufficientBuffer);
        assert_eq!(ErrorCode::from(1332), ErrorCode::NoneMapped);
        assert_eq!(ErrorCode::from(999), ErrorCode::Unknown(999));
        for code in [0, 5, 6, 87, 122, 234, 1300, 1313, 1332, 4242] {
            assert_eq!(ErrorCode::from(code).code(), code);
        }
    }

    #[test]
    fn test_buffer_too_small() {
        assert!(ErrorCode::InsufficientBuffer.is_buffer_too_small());
        assert!(ErrorCode::MoreData.is_buffer_too_small());
        assert!(!ErrorCode::NoneMapped.is_buffer_too_small());
    }

    #[test]
    fn test_from_hresult() {
        assert_eq!(ErrorCode::from_hresult(0), ErrorCode::Success);
        // HRESULT_FROM_WIN32(ERROR_INSUFFICIENT_BUFFER)
        assert_eq!(
            ErrorCode::from_hresult(0x8007_007a_u32 as i32),
            ErrorCode::InsufficientBuffer
        );
        assert!(ErrorCode::from_hresult(0x8007_00ea_u32 as i32).is_buffer_too_small());
        assert_eq!(
            ErrorCode::from_hresult(0x8007_0521_u32 as i32),
            ErrorCode::NoSuchPrivilege
        );
        // E_FAIL is not a Win32 facility code
        assert_eq!(
            ErrorCode::from_hresult(0x8000_4005_u32 as i32),
            ErrorCode::Unknown(0x8000_4005)
        );
    }

    #[cfg(windows)]
    #[test]
    fn test_from_windows_error() {
        let err = ::windows::core::Error::from(::windows::core::HRESULT::from_win32(1332));
        assert_eq!(ErrorCode::from(&err), ErrorCode::NoneMapped);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "Success");
        assert_eq!(format!("{}", ErrorCode::AccessDenied), "Access denied");
        assert_eq!(format!("{}", ErrorCode::Unknown(123)), "Unknown error: 123");
    }

    #[test]
    fn test_win_error() {
        let err = WinError::with_code(ErrorCode::NotAllAssigned, "AdjustTokenPrivileges");
        assert_eq!(err.code(), ErrorCode::NotAllAssigned);
        let os = err.to_os_error();
        assert_eq!(os.code, 1300);
        assert!(os.message.starts_with("AdjustTokenPrivileges: "));
    }
}
