//! Security identifier (SID) in its binary form

use super::error::{IdentityError, IdentityResult};
use std::fmt;
use std::str::FromStr;

/// Maximum number of sub-authorities a SID may carry
pub const SID_MAX_SUB_AUTHORITIES: usize = 15;

const SID_HEADER_LEN: usize = 8;

/// Owned security identifier
///
/// Holds the exact bytes the OS uses (`revision`, sub-authority count,
/// 48-bit big-endian identifier authority, little-endian sub-authorities)
/// so it can be passed straight back to native lookups.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Sid {
    buf: Vec<u8>,
}

impl Sid {
    /// Build a SID from its components
    pub fn from_parts(revision: u8, authority: u64, sub_authorities: &[u32]) -> IdentityResult<Self> {
        if sub_authorities.len() > SID_MAX_SUB_AUTHORITIES {
            return Err(IdentityError::InvalidSid(format!(
                "{} sub-authorities (max {})",
                sub_authorities.len(),
                SID_MAX_SUB_AUTHORITIES
            )));
        }
        if authority >> 48 != 0 {
            return Err(IdentityError::InvalidSid(format!(
                "identifier authority 0x{:X} exceeds 48 bits",
                authority
            )));
        }

        let mut buf = Vec::with_capacity(SID_HEADER_LEN + 4 * sub_authorities.len());
        buf.push(revision);
        buf.push(sub_authorities.len() as u8);
        buf.extend_from_slice(&authority.to_be_bytes()[2..]);
        for sub in sub_authorities {
            buf.extend_from_slice(&sub.to_le_bytes());
        }
        Ok(Sid { buf })
    }

    /// Copy a SID out of a raw buffer, validating its declared length
    ///
    /// Bytes past the declared sub-authorities are ignored.
    pub fn from_bytes(bytes: &[u8]) -> IdentityResult<Self> {
        if bytes.len() < SID_HEADER_LEN {
            return Err(IdentityError::InvalidSid(format!(
                "{} bytes is shorter than the SID header",
                bytes.len()
            )));
        }
        let count = bytes[1] as usize;
        if count > SID_MAX_SUB_AUTHORITIES {
            return Err(IdentityError::InvalidSid(format!(
                "{} sub-authorities (max {})",
                count, SID_MAX_SUB_AUTHORITIES
            )));
        }
        let len = SID_HEADER_LEN + 4 * count;
        if bytes.len() < len {
            return Err(IdentityError::InvalidSid(format!(
                "expected {} bytes, got {}",
                len,
                bytes.len()
            )));
        }
        Ok(Sid {
            buf: bytes[..len].to_vec(),
        })
    }

    /// Parse the canonical `S-R-I-S...` form
    pub fn parse(s: &str) -> IdentityResult<Self> {
        let invalid = || IdentityError::InvalidSid(s.to_string());

        let mut parts = s.split('-');
        match parts.next() {
            Some(prefix) if prefix.eq_ignore_ascii_case("S") => {}
            _ => return Err(invalid()),
        }

        let revision: u8 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;

        let authority = match parts.next() {
            Some(p) if p.starts_with("0x") || p.starts_with("0X") => {
                u64::from_str_radix(&p[2..], 16).map_err(|_| invalid())?
            }
            Some(p) => p.parse::<u64>().map_err(|_| invalid())?,
            None => return Err(invalid()),
        };

        let subs = parts
            .map(|p| p.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        Sid::from_parts(revision, authority, &subs)
    }

    /// Raw bytes, suitable for passing as a `PSID`
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn revision(&self) -> u8 {
        self.buf[0]
    }

    /// 48-bit identifier authority
    pub fn authority(&self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes[2..].copy_from_slice(&self.buf[2..SID_HEADER_LEN]);
        u64::from_be_bytes(bytes)
    }

    pub fn sub_authorities(&self) -> impl Iterator<Item = u32> + '_ {
        self.buf[SID_HEADER_LEN..]
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
    }

    /// Last sub-authority (relative identifier)
    pub fn rid(&self) -> Option<u32> {
        self.sub_authorities().last()
    }
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}-", self.revision())?;
        let authority = self.authority();
        if authority >> 32 == 0 {
            write!(f, "{}", authority)?;
        } else {
            write!(f, "0x{:012X}", authority)?;
        }
        for sub in self.sub_authorities() {
            write!(f, "-{}", sub)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sid({})", self)
    }
}

impl FromStr for Sid {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sid::parse(s)
    }
}
