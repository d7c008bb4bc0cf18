//! Token privileges: decoding, attribute views and mutation

use super::api::{PrivilegeAdjust, TokenQuery};
use super::resolve;
use crate::core::types::{IdentityError, IdentityResult, Luid, TokenTarget};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// `SE_PRIVILEGE_*` attribute bits
pub mod attributes {
    pub const ENABLED_BY_DEFAULT: u32 = 0x0000_0001;
    pub const ENABLED: u32 = 0x0000_0002;
    pub const REMOVED: u32 = 0x0000_0004;
    pub const USED_FOR_ACCESS: u32 = 0x8000_0000;
}

/// Size of the leading privilege count
const COUNT_LEN: usize = 4;
/// Size of one `{LUID, attributes}` record
const RECORD_LEN: usize = 12;

/// One privilege held by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Privilege {
    luid: Luid,
    name: String,
    description: String,
    attributes: u32,
    #[serde(skip)]
    source: TokenTarget,
}

impl Privilege {
    pub fn new(
        luid: Luid,
        name: impl Into<String>,
        description: impl Into<String>,
        attributes: u32,
        source: TokenTarget,
    ) -> Self {
        Privilege {
            luid,
            name: name.into(),
            description: description.into(),
            attributes,
            source,
        }
    }

    pub fn luid(&self) -> Luid {
        self.luid
    }

    /// Programmatic name, e.g. `SeShutdownPrivilege`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name, e.g. `Shut down the system`
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Raw attribute bitmask (see [`attributes`])
    pub fn attributes(&self) -> u32 {
        self.attributes
    }

    /// Token this privilege was read from
    pub fn source(&self) -> TokenTarget {
        self.source
    }

    pub fn is_enabled(&self) -> bool {
        self.attributes & attributes::ENABLED != 0
    }

    pub fn is_enabled_by_default(&self) -> bool {
        self.attributes & attributes::ENABLED_BY_DEFAULT != 0
    }

    pub fn is_removed(&self) -> bool {
        self.attributes & attributes::REMOVED != 0
    }

    pub fn is_used_for_access(&self) -> bool {
        self.attributes & attributes::USED_FOR_ACCESS != 0
    }

    /// `Enabled` or `Disabled`, as shown by `whoami /priv`
    pub fn state_label(&self) -> &'static str {
        if self.is_enabled() {
            "Enabled"
        } else {
            "Disabled"
        }
    }

    /// Enable the privilege on the source token
    pub fn enable<A: PrivilegeAdjust + ?Sized>(&mut self, api: &A) -> IdentityResult<()> {
        self.apply(api, self.attributes | attributes::ENABLED)
    }

    /// Disable the privilege on the source token
    pub fn disable<A: PrivilegeAdjust + ?Sized>(&mut self, api: &A) -> IdentityResult<()> {
        self.apply(api, self.attributes & !attributes::ENABLED)
    }

    /// Permanently remove the privilege from the source token
    pub fn remove<A: PrivilegeAdjust + ?Sized>(&mut self, api: &A) -> IdentityResult<()> {
        self.apply(api, self.attributes | attributes::REMOVED)
    }

    // The local bitmask only changes once the token accepted the new state.
    fn apply<A: PrivilegeAdjust + ?Sized>(&mut self, api: &A, desired: u32) -> IdentityResult<()> {
        if desired == self.attributes {
            debug!(privilege = %self.name, "privilege already in requested state");
            return Ok(());
        }

        debug!(
            privilege = %self.name,
            from = self.attributes,
            to = desired,
            target = %self.source,
            "adjusting privilege"
        );
        api.adjust_privilege(self.source, self.luid, desired)
            .map_err(|e| IdentityError::adjustment_failed(self.name.clone(), e))?;

        self.attributes = desired;
        Ok(())
    }
}

/// Decode a raw `TOKEN_PRIVILEGES` buffer
///
/// Layout: `count: u32` then `count` records of `{luid: u64, attributes: u32}`,
/// all little-endian. The whole buffer is length-checked before any name is
/// resolved; bytes past the last record are ignored. Every record must
/// resolve both its name and description or the whole decode fails.
pub fn decode_privileges<Q: TokenQuery + ?Sized>(
    api: &Q,
    buf: &[u8],
    source: TokenTarget,
) -> IdentityResult<Vec<Privilege>> {
    trace!(len = buf.len(), bytes = %hex::encode(buf), "raw privilege buffer");

    let records = split_records(buf)?;
    debug!(count = records.len(), "decoding token privileges");

    records
        .into_iter()
        .map(|(luid, attrs)| {
            let name = resolve::privilege_name(api, luid)?;
            let description = resolve::privilege_description(api, &name)?;
            Ok(Privilege::new(luid, name, description, attrs, source))
        })
        .collect()
}

/// Split a privilege buffer into `(luid, attributes)` pairs
pub fn split_records(buf: &[u8]) -> IdentityResult<Vec<(Luid, u32)>> {
    let header: [u8; COUNT_LEN] = buf
        .get(..COUNT_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| IdentityError::malformed_buffer(COUNT_LEN, buf.len()))?;
    let count = u32::from_le_bytes(header) as usize;

    let expected = count
        .checked_mul(RECORD_LEN)
        .and_then(|n| n.checked_add(COUNT_LEN))
        .ok_or_else(|| IdentityError::malformed_buffer(usize::MAX, buf.len()))?;
    if buf.len() < expected {
        return Err(IdentityError::malformed_buffer(expected, buf.len()));
    }

    Ok(buf[COUNT_LEN..expected]
        .chunks_exact(RECORD_LEN)
        .map(|record| {
            let mut luid = [0u8; 8];
            luid.copy_from_slice(&record[..8]);
            let attrs = u32::from_le_bytes([record[8], record[9], record[10], record[11]]);
            (Luid::from_le_bytes(luid), attrs)
        })
        .collect())
}

/// Encode `(luid, attributes)` pairs into the native buffer layout
pub fn encode_records(records: &[(Luid, u32)]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(COUNT_LEN + RECORD_LEN * records.len());
    buf.extend_from_slice(&(records.len() as u32).to_le_bytes());
    for (luid, attrs) in records {
        buf.extend_from_slice(&luid.as_u64().to_le_bytes());
        buf.extend_from_slice(&attrs.to_le_bytes());
    }
    buf
}
