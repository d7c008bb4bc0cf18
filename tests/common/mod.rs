//! In-memory token backend shared by the integration tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use winid::core::types::{Luid, OsError, Sid, TokenTarget};
use winid::identity::api::{Account, LookupFailure, LookupStatus, RawGroup};
use winid::identity::privilege::encode_records;
use winid::{PrivilegeAdjust, TokenQuery};

pub const ERROR_ACCESS_DENIED: u32 = 5;
pub const ERROR_NOT_ALL_ASSIGNED: u32 = 1300;
pub const ERROR_NO_SUCH_PRIVILEGE: u32 = 1313;

/// Well-known privileges with their LUIDs on a stock install
pub const PRIVILEGES: &[(u64, &str, &str)] = &[
    (0x13, "SeShutdownPrivilege", "Shut down the system"),
    (0x14, "SeDebugPrivilege", "Debug programs"),
    (0x17, "SeChangeNotifyPrivilege", "Bypass traverse checking"),
    (0x19, "SeUndockPrivilege", "Remove computer from docking station"),
    (0x20, "SeShutdownPrivilege", "Shut down the system"),
    (0x21, "SeIncreaseWorkingSetPrivilege", "Increase a process working set"),
    (0x22, "SeTimeZonePrivilege", "Change the time zone"),
];

pub fn sid(s: &str) -> Sid {
    Sid::parse(s).unwrap()
}

/// Write `value` with the native lookup conventions: report the required
/// length (terminator included) when `buf` is too small.
pub fn write_wide(value: &str, buf: &mut [u16]) -> LookupStatus {
    let wide: Vec<u16> = value.encode_utf16().collect();
    if buf.len() <= wide.len() {
        return Err(LookupFailure::InsufficientBuffer(wide.len() + 1));
    }
    buf[..wide.len()].copy_from_slice(&wide);
    buf[wide.len()] = 0;
    Ok(wide.len())
}

/// Configurable fake for both capabilities
pub struct FakeToken {
    pub user: String,
    pub user_sid: Sid,
    pub groups: Vec<RawGroup>,
    pub accounts: HashMap<String, Result<Option<Account>, OsError>>,
    pub privilege_buffer: Vec<u8>,
    pub privilege_names: HashMap<u64, String>,
    pub descriptions: HashMap<String, String>,
    pub fail_query: Option<&'static str>,
    pub fail_adjust: Option<u32>,
    pub name_calls: Cell<usize>,
    pub description_calls: Cell<usize>,
    pub adjustments: RefCell<Vec<(TokenTarget, Luid, u32)>>,
    pub queried: RefCell<Vec<TokenTarget>>,
}

impl FakeToken {
    pub fn new() -> Self {
        let mut privilege_names = HashMap::new();
        let mut descriptions = HashMap::new();
        for (luid, name, description) in PRIVILEGES {
            privilege_names.insert(*luid, name.to_string());
            descriptions.insert(name.to_string(), description.to_string());
        }

        FakeToken {
            user: "DESKTOP-1\\Alice".to_string(),
            user_sid: sid("S-1-5-21-1004336348-1177238915-682003330-1001"),
            groups: Vec::new(),
            accounts: HashMap::new(),
            privilege_buffer: encode_records(&[]),
            privilege_names,
            descriptions,
            fail_query: None,
            fail_adjust: None,
            name_calls: Cell::new(0),
            description_calls: Cell::new(0),
            adjustments: RefCell::new(Vec::new()),
            queried: RefCell::new(Vec::new()),
        }
    }

    /// Typical medium-integrity interactive user
    pub fn workstation() -> Self {
        let mut fake = FakeToken::new()
            .with_group("S-1-1-0", 0x7, "", "Everyone", 5)
            .with_group("S-1-5-32-544", 0x10, "BUILTIN", "Administrators", 4)
            .with_group("S-1-5-32-545", 0x7, "BUILTIN", "Users", 4)
            .with_group("S-1-5-4", 0x7, "NT AUTHORITY", "INTERACTIVE", 5)
            .with_group("S-1-16-8192", 0x60, "Mandatory Label", "Medium Mandatory Level", 10);
        fake = fake.with_logon_session("S-1-5-5-0-171290", 0xc000_0007);
        fake.with_privileges(&[(0x13, 0), (0x17, 0x3), (0x19, 0), (0x21, 0), (0x22, 0)])
    }

    pub fn with_group(
        mut self,
        sid_text: &str,
        attributes: u32,
        domain: &str,
        name: &str,
        use_code: u32,
    ) -> Self {
        self.groups.push(RawGroup::new(sid(sid_text), attributes));
        self.accounts.insert(
            sid_text.to_string(),
            Ok(Some(Account::new(name, domain, use_code))),
        );
        self
    }

    pub fn with_unmapped(mut self, sid_text: &str, attributes: u32) -> Self {
        self.groups.push(RawGroup::new(sid(sid_text), attributes));
        self.accounts.insert(sid_text.to_string(), Ok(None));
        self
    }

    pub fn with_logon_session(self, sid_text: &str, attributes: u32) -> Self {
        self.with_group(sid_text, attributes, "NT AUTHORITY", "LogonSessionId_0_171290", 11)
    }

    pub fn with_lookup_error(mut self, sid_text: &str, code: u32) -> Self {
        self.groups.push(RawGroup::new(sid(sid_text), 0x7));
        self.accounts.insert(
            sid_text.to_string(),
            Err(OsError::new(code, "LookupAccountSidW: failure")),
        );
        self
    }

    pub fn with_privileges(mut self, records: &[(u64, u32)]) -> Self {
        let records: Vec<(Luid, u32)> = records.iter().map(|&(l, a)| (Luid::new(l), a)).collect();
        self.privilege_buffer = encode_records(&records);
        self
    }

    pub fn failing_query(mut self, query: &'static str) -> Self {
        self.fail_query = Some(query);
        self
    }

    pub fn adjust_count(&self) -> usize {
        self.adjustments.borrow().len()
    }

    fn check(&self, query: &'static str, target: TokenTarget) -> Result<(), OsError> {
        self.queried.borrow_mut().push(target);
        if self.fail_query == Some(query) {
            return Err(OsError::new(
                ERROR_ACCESS_DENIED,
                format!("{}: Access is denied.", query),
            ));
        }
        Ok(())
    }
}

impl TokenQuery for FakeToken {
    fn user_name(&self, target: TokenTarget) -> Result<String, OsError> {
        self.check("user_name", target)?;
        Ok(self.user.clone())
    }

    fn user_sid(&self, target: TokenTarget) -> Result<Sid, OsError> {
        self.check("user_sid", target)?;
        Ok(self.user_sid.clone())
    }

    fn token_groups(&self, target: TokenTarget) -> Result<Vec<RawGroup>, OsError> {
        self.check("token_groups", target)?;
        Ok(self.groups.clone())
    }

    fn token_privileges(&self, target: TokenTarget) -> Result<Vec<u8>, OsError> {
        self.check("token_privileges", target)?;
        Ok(self.privilege_buffer.clone())
    }

    fn lookup_account(&self, sid: &Sid) -> Result<Option<Account>, OsError> {
        self.accounts
            .get(&sid.to_string())
            .cloned()
            .unwrap_or(Ok(None))
    }

    fn lookup_privilege_name(&self, luid: Luid, buf: &mut [u16]) -> LookupStatus {
        self.name_calls.set(self.name_calls.get() + 1);
        match self.privilege_names.get(&luid.as_u64()) {
            Some(name) => write_wide(name, buf),
            None => Err(LookupFailure::Os(OsError::new(
                ERROR_NO_SUCH_PRIVILEGE,
                "LookupPrivilegeNameW: A specified privilege does not exist.",
            ))),
        }
    }

    fn lookup_privilege_display_name(&self, name: &str, buf: &mut [u16]) -> LookupStatus {
        self.description_calls.set(self.description_calls.get() + 1);
        match self.descriptions.get(name) {
            Some(description) => write_wide(description, buf),
            None => Err(LookupFailure::Os(OsError::new(
                ERROR_NO_SUCH_PRIVILEGE,
                "LookupPrivilegeDisplayNameW: A specified privilege does not exist.",
            ))),
        }
    }
}

impl PrivilegeAdjust for FakeToken {
    fn adjust_privilege(
        &self,
        target: TokenTarget,
        luid: Luid,
        attributes: u32,
    ) -> Result<(), OsError> {
        self.adjustments.borrow_mut().push((target, luid, attributes));
        match self.fail_adjust {
            Some(code) => Err(OsError::new(
                code,
                "AdjustTokenPrivileges: Not all privileges or groups referenced are assigned to the caller.",
            )),
            None => Ok(()),
        }
    }
}
