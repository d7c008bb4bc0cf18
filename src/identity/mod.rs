//! Access token identity decoding
//!
//! Turns the raw results of token queries into an [`Identity`]: the user,
//! its group memberships and its privileges, with `whoami`-style reports.
//! All native access goes through the [`TokenQuery`] and [`PrivilegeAdjust`]
//! capabilities handed in by the caller.

pub mod api;
pub mod group;
pub mod id;
pub mod privilege;
pub mod report;
pub mod resolve;

pub use api::{Account, LookupFailure, LookupStatus, PrivilegeAdjust, RawGroup, TokenQuery};
pub use group::{decode_group_attributes, decode_groups, AccountType, Group};
pub use id::{whoami, whoami_all, whoami_groups, whoami_privileges, whoami_user, Identity};
pub use privilege::{decode_privileges, Privilege};
pub use resolve::probe_then_fetch;
