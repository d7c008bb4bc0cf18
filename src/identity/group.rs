//! Token group memberships: account classification and attribute decoding

use super::api::{RawGroup, TokenQuery};
use crate::core::types::{IdentityError, IdentityResult, Sid};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Account name returned for SIDs that only map to the placeholder "None" group
pub const UNMAPPED_ACCOUNT: &str = "None";

/// Account name prefix of per-logon-session pseudo groups
pub const LOGON_SESSION_PREFIX: &str = "LogonSessionId_";

/// Every group attribute bit this decoder understands
pub const VALID_GROUP_ATTRIBUTES: u32 = 0xe000_007f;

/// Named `SE_GROUP_*` bits, in ascending bit order
const GROUP_ATTRIBUTE_NAMES: [(u32, &str); 9] = [
    (0x0000_0001, "Mandatory group"),
    (0x0000_0002, "Enabled by default"),
    (0x0000_0004, "Enabled group"),
    (0x0000_0008, "Group owner"),
    (0x0000_0010, "Group used for deny only"),
    (0x0000_0020, "Integrity"),
    (0x0000_0040, "Integrity enabled"),
    (0x2000_0000, "Local Group"),
    (0xc000_0000, "Logon ID"),
];

/// Account type from the `SID_NAME_USE` code of a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "Unknown SID type")]
    Unknown,
    User,
    Group,
    Domain,
    Alias,
    #[serde(rename = "Well-known group")]
    WellKnownGroup,
    Deleted,
    Invalid,
    Computer,
    Label,
}

impl AccountType {
    /// Map a `SID_NAME_USE` code; unrecognized codes are `Unknown`
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => AccountType::User,
            2 => AccountType::Group,
            3 => AccountType::Domain,
            4 => AccountType::Alias,
            5 => AccountType::WellKnownGroup,
            6 => AccountType::Deleted,
            7 => AccountType::Invalid,
            8 => AccountType::Computer,
            10 => AccountType::Label,
            _ => AccountType::Unknown,
        }
    }

    /// Label used in `whoami /groups`
    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Unknown => "Unknown SID type",
            AccountType::User => "User",
            AccountType::Group => "Group",
            AccountType::Domain => "Domain",
            AccountType::Alias => "Alias",
            AccountType::WellKnownGroup => "Well-known group",
            AccountType::Deleted => "Deleted",
            AccountType::Invalid => "Invalid",
            AccountType::Computer => "Computer",
            AccountType::Label => "Label",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One group membership of an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// `DOMAIN\account`, or the bare account when there is no domain
    pub name: String,
    pub sid: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Decoded attribute names, in ascending bit order
    pub attributes: Vec<String>,
}

impl Group {
    /// Whether the named attribute was decoded for this group
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }
}

/// Decode a group attribute bitmask into attribute names
///
/// A mask with any bit outside [`VALID_GROUP_ATTRIBUTES`] decodes to nothing.
pub fn decode_group_attributes(bits: u32) -> Vec<&'static str> {
    if bits & !VALID_GROUP_ATTRIBUTES != 0 {
        return Vec::new();
    }

    GROUP_ATTRIBUTE_NAMES
        .iter()
        .filter(|(bit, _)| bits & bit != 0)
        .map(|(_, name)| *name)
        .collect()
}

/// Resolve one SID to `(name, type)`, or `None` when the entry is filtered out
pub fn resolve_group_account<Q: TokenQuery + ?Sized>(
    api: &Q,
    sid: &Sid,
) -> IdentityResult<Option<(String, AccountType)>> {
    let account = match api
        .lookup_account(sid)
        .map_err(|e| IdentityError::sid_lookup(sid, e))?
    {
        Some(account) => account,
        None => return Ok(None),
    };

    if account.name == UNMAPPED_ACCOUNT || account.name.starts_with(LOGON_SESSION_PREFIX) {
        return Ok(None);
    }

    let name = if account.domain.is_empty() {
        account.name
    } else {
        format!("{}\\{}", account.domain, account.name)
    };

    Ok(Some((name, AccountType::from_code(account.use_code))))
}

/// Decode the token's group list
///
/// Unmapped SIDs and logon-session pseudo groups are dropped; any other
/// lookup failure fails the whole list.
pub fn decode_groups<Q: TokenQuery + ?Sized>(
    api: &Q,
    raw: &[RawGroup],
) -> IdentityResult<Vec<Group>> {
    let mut groups = Vec::with_capacity(raw.len());

    for entry in raw {
        let Some((name, account_type)) = resolve_group_account(api, &entry.sid)? else {
            debug!(sid = %entry.sid, "skipping unmapped or logon session group");
            continue;
        };

        let attributes = if account_type == AccountType::Label {
            Vec::new()
        } else {
            decode_group_attributes(entry.attributes)
                .into_iter()
                .map(String::from)
                .collect()
        };

        groups.push(Group {
            name,
            sid: entry.sid.to_string(),
            account_type,
            attributes,
        });
    }

    debug!(total = raw.len(), kept = groups.len(), "decoded token groups");
    Ok(groups)
}
