//! Identity assembly and whoami-style rendering

use super::api::{PrivilegeAdjust, TokenQuery};
use super::group::{decode_groups, Group};
use super::privilege::{decode_privileges, Privilege};
use super::report::{
    render_section, GROUP_HEADERS, GROUP_SECTION, PRIVILEGE_HEADERS, PRIVILEGE_SECTION,
    USER_HEADERS, USER_SECTION,
};
use crate::core::types::{IdentityError, IdentityResult, TokenTarget};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Decoded view of one access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    name: String,
    sid: String,
    groups: Vec<Group>,
    privileges: Vec<Privilege>,
}

impl Identity {
    pub fn new(
        name: impl Into<String>,
        sid: impl Into<String>,
        groups: Vec<Group>,
        privileges: Vec<Privilege>,
    ) -> Self {
        Identity {
            name: name.into(),
            sid: sid.into(),
            groups,
            privileges,
        }
    }

    /// Query and decode a token; `None` selects the current process
    ///
    /// Either every part resolves or an error is returned.
    pub fn query<Q: TokenQuery + ?Sized>(
        api: &Q,
        target: Option<TokenTarget>,
    ) -> IdentityResult<Self> {
        let target = TokenTarget::or_current(target);
        debug!(%target, "querying identity");

        let name = api
            .user_name(target)
            .map_err(|e| IdentityError::token_query("user name", e))?;

        let sid = api
            .user_sid(target)
            .map_err(|e| IdentityError::token_query("token user", e))?;

        let raw_groups = api
            .token_groups(target)
            .map_err(|e| IdentityError::token_query("token groups", e))?;
        let groups = decode_groups(api, &raw_groups)?;

        let buf = api
            .token_privileges(target)
            .map_err(|e| IdentityError::token_query("token privileges", e))?;
        let privileges = decode_privileges(api, &buf, target)?;

        Ok(Identity {
            name,
            sid: sid.to_string(),
            groups,
            privileges,
        })
    }

    /// Domain-qualified user name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sid(&self) -> &str {
        &self.sid
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn privileges(&self) -> &[Privilege] {
        &self.privileges
    }

    /// Lowercase the user name in place, as `whoami.exe` prints it
    pub fn lowercase_name(&mut self) {
        self.name = self.name.to_lowercase();
    }

    /// Find a group by name (ASCII case-insensitive)
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// Find a privilege by name (ASCII case-insensitive)
    pub fn privilege(&self, name: &str) -> Option<&Privilege> {
        self.privileges
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    pub fn privilege_mut(&mut self, name: &str) -> Option<&mut Privilege> {
        self.privileges
            .iter_mut()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Enable a named privilege, failing if the token does not hold it
    pub fn enable_privilege<A: PrivilegeAdjust + ?Sized>(
        &mut self,
        api: &A,
        name: &str,
    ) -> IdentityResult<()> {
        self.held_privilege(name)?.enable(api)
    }

    /// Disable a named privilege, failing if the token does not hold it
    pub fn disable_privilege<A: PrivilegeAdjust + ?Sized>(
        &mut self,
        api: &A,
        name: &str,
    ) -> IdentityResult<()> {
        self.held_privilege(name)?.disable(api)
    }

    /// Remove a named privilege, failing if the token does not hold it
    pub fn remove_privilege<A: PrivilegeAdjust + ?Sized>(
        &mut self,
        api: &A,
        name: &str,
    ) -> IdentityResult<()> {
        self.held_privilege(name)?.remove(api)
    }

    fn held_privilege(&mut self, name: &str) -> IdentityResult<&mut Privilege> {
        self.privilege_mut(name)
            .ok_or_else(|| IdentityError::PrivilegeNotFound(name.to_string()))
    }

    /// Plain `whoami` output: the user name
    pub fn whoami(&self) -> String {
        self.name.clone()
    }

    /// `whoami /user`
    pub fn whoami_user(&self) -> String {
        let rows = vec![vec![self.name.as_str(), self.sid.as_str()]];
        render_section(USER_SECTION, &USER_HEADERS, &rows)
    }

    /// `whoami /groups`
    pub fn whoami_groups(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .groups
            .iter()
            .map(|g| {
                vec![
                    g.name.clone(),
                    g.account_type.label().to_string(),
                    g.sid.clone(),
                    g.attributes.join(", "),
                ]
            })
            .collect();
        render_section(GROUP_SECTION, &GROUP_HEADERS, &rows)
    }

    /// `whoami /priv`
    pub fn whoami_privileges(&self) -> String {
        let rows: Vec<Vec<&str>> = self
            .privileges
            .iter()
            .map(|p| vec![p.name(), p.description(), p.state_label()])
            .collect();
        render_section(PRIVILEGE_SECTION, &PRIVILEGE_HEADERS, &rows)
    }

    /// `whoami /all`: user, groups and privileges sections
    pub fn whoami_all(&self) -> String {
        [
            self.whoami_user(),
            self.whoami_groups(),
            self.whoami_privileges(),
        ]
        .join("\n")
    }
}

/// Query a token and return plain `whoami` output
pub fn whoami<Q: TokenQuery + ?Sized>(api: &Q, target: Option<TokenTarget>) -> IdentityResult<String> {
    Ok(Identity::query(api, target)?.whoami())
}

/// Query a token and return `whoami /user` output
pub fn whoami_user<Q: TokenQuery + ?Sized>(
    api: &Q,
    target: Option<TokenTarget>,
) -> IdentityResult<String> {
    Ok(Identity::query(api, target)?.whoami_user())
}

/// Query a token and return `whoami /groups` output
pub fn whoami_groups<Q: TokenQuery + ?Sized>(
    api: &Q,
    target: Option<TokenTarget>,
) -> IdentityResult<String> {
    Ok(Identity::query(api, target)?.whoami_groups())
}

/// Query a token and return `whoami /priv` output
pub fn whoami_privileges<Q: TokenQuery + ?Sized>(
    api: &Q,
    target: Option<TokenTarget>,
) -> IdentityResult<String> {
    Ok(Identity::query(api, target)?.whoami_privileges())
}

/// Query a token and return `whoami /all` output
pub fn whoami_all<Q: TokenQuery + ?Sized>(
    api: &Q,
    target: Option<TokenTarget>,
) -> IdentityResult<String> {
    Ok(Identity::query(api, target)?.whoami_all())
}
