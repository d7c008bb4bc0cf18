//! Probe-then-fetch resolution of variable-length native strings

use super::api::{LookupFailure, LookupStatus, TokenQuery};
use crate::core::types::{IdentityError, IdentityResult, Luid, OsError};
use tracing::trace;

/// Resolve a string from a native query that reports its required size
///
/// The query is first called with an empty buffer. If it reports
/// [`LookupFailure::InsufficientBuffer`], a buffer of exactly the reported
/// length is allocated and the query is called once more. Any other failure,
/// or a failure on the second call, is returned as-is. Nothing is cached.
pub fn probe_then_fetch<F>(mut query: F) -> Result<String, LookupFailure>
where
    F: FnMut(&mut [u16]) -> LookupStatus,
{
    let mut buf: Vec<u16> = Vec::new();

    let required = match query(&mut buf) {
        Ok(written) => return Ok(decode(&buf, written)),
        Err(LookupFailure::InsufficientBuffer(required)) => required,
        Err(other) => return Err(other),
    };

    trace!(required, "probe reported required buffer length");
    buf = vec![0u16; required];
    let written = query(&mut buf)?;
    Ok(decode(&buf, written))
}

fn decode(buf: &[u16], written: usize) -> String {
    let slice = &buf[..written.min(buf.len())];
    // Some APIs count the terminator in the written length
    let len = slice.iter().position(|&c| c == 0).unwrap_or(slice.len());
    String::from_utf16_lossy(&slice[..len])
}

fn failure_reason(failure: LookupFailure) -> String {
    match failure {
        LookupFailure::InsufficientBuffer(required) => format!(
            "buffer still too small after probing (needs {} units)",
            required
        ),
        LookupFailure::Os(err) => err.to_string(),
    }
}

/// Convert a failed lookup into an [`OsError`], for backends that
/// reuse the protocol outside name resolution
pub fn failure_to_os_error(failure: LookupFailure) -> OsError {
    match failure {
        LookupFailure::Os(err) => err,
        other => OsError::new(0, failure_reason(other)),
    }
}

/// Resolve the programmatic name (`SeDebugPrivilege`, ...) of a privilege LUID
pub fn privilege_name<Q: TokenQuery + ?Sized>(api: &Q, luid: Luid) -> IdentityResult<String> {
    probe_then_fetch(|buf| api.lookup_privilege_name(luid, buf))
        .map_err(|f| IdentityError::name_resolution("privilege name", luid, failure_reason(f)))
}

/// Resolve the human-readable description of a privilege name
pub fn privilege_description<Q: TokenQuery + ?Sized>(
    api: &Q,
    name: &str,
) -> IdentityResult<String> {
    probe_then_fetch(|buf| api.lookup_privilege_display_name(name, buf)).map_err(|f| {
        IdentityError::name_resolution("privilege description", name, failure_reason(f))
    })
}
