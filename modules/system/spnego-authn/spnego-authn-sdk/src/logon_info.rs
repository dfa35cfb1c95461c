//! Logon info carried in a ticket's PAC authorization data.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::AccountStatus;

/// `USER_ACCOUNT_DISABLED` bit of the PAC `UserAccountControl` field.
pub const USER_ACCOUNT_DISABLED: u32 = 0x0000_0001;
/// `USER_ACCOUNT_AUTO_LOCKED` bit of the PAC `UserAccountControl` field.
pub const USER_ACCOUNT_AUTO_LOCKED: u32 = 0x0000_0400;
/// `USER_PASSWORD_EXPIRED` bit of the PAC `UserAccountControl` field.
pub const USER_PASSWORD_EXPIRED: u32 = 0x0002_0000;

/// Subset of the PAC `KERB_VALIDATION_INFO` structure, as decoded by the
/// ticket validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogonInfo {
    pub user_name: String,
    pub display_name: Option<String>,
    pub domain_name: Option<String>,
    pub user_sid: Option<String>,
    pub primary_group_sid: Option<String>,
    pub group_sids: Vec<String>,
    /// SIDs from other domains (`ExtraSids`), e.g. universal groups.
    pub extra_sids: Vec<String>,
    /// Domain-local group SIDs from the resource domain.
    pub resource_group_sids: Vec<String>,
    pub user_flags: u32,
    /// Raw `UserAccountControl` flags. `None` when the issuer did not supply them.
    pub user_account_control: Option<u32>,
    pub logon_count: u16,
    pub bad_password_count: u16,
}

impl LogonInfo {
    /// Group SIDs in PAC order, first occurrence wins.
    ///
    /// The primary group comes first, then `group_sids`. Extra and resource
    /// group SIDs follow when `include_extra` is set.
    #[must_use]
    pub fn group_sids(&self, include_extra: bool) -> Vec<&str> {
        let extra: &[String] = if include_extra { &self.extra_sids } else { &[] };
        let resource: &[String] = if include_extra {
            &self.resource_group_sids
        } else {
            &[]
        };

        let mut seen = HashSet::new();
        self.primary_group_sid
            .iter()
            .chain(&self.group_sids)
            .chain(extra)
            .chain(resource)
            .map(String::as_str)
            .filter(|sid| seen.insert(*sid))
            .collect()
    }

    /// Account status decoded from `UserAccountControl`.
    ///
    /// Returns `None` when the flags are absent; callers decide what that means.
    /// The PAC has no account-expiry bit, so a decoded status never reports the
    /// account itself as expired.
    #[must_use]
    pub fn account_status(&self) -> Option<AccountStatus> {
        let uac = self.user_account_control?;
        Some(AccountStatus {
            enabled: uac & USER_ACCOUNT_DISABLED == 0,
            account_non_expired: true,
            credentials_non_expired: uac & USER_PASSWORD_EXPIRED == 0,
            account_non_locked: uac & USER_ACCOUNT_AUTO_LOCKED == 0,
        })
    }
}
