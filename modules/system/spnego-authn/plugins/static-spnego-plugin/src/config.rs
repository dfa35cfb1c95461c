//! Configuration for the static SPNEGO `AuthN` plugin.

use serde::Deserialize;
use spnego_authn_sdk::{AccountStatus, LogonInfo, UserIdentityRecord};

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticSpnegoPluginConfig {
    /// Tickets the validator accepts.
    pub tickets: Vec<TicketMapping>,

    /// Directory entries.
    pub users: Vec<UserConfig>,
}

/// Maps a static ticket to the principal it authenticates.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TicketMapping {
    /// Base64 (standard alphabet) ticket bytes to match.
    pub ticket: String,

    /// Principal name, e.g. `alice@EXAMPLE.COM`.
    pub principal: String,

    /// Kerberos name-type code. Defaults to `KRB_NT_PRINCIPAL`.
    #[serde(default)]
    pub name_type: Option<i32>,

    /// Base64 mutual-authentication token to hand back to the client.
    #[serde(default)]
    pub response_token: Option<String>,

    /// PAC logon info attached to the principal.
    #[serde(default)]
    pub logon_info: Option<LogonInfo>,

    /// Attach a delegated credential to the principal.
    #[serde(default)]
    pub delegate: bool,
}

/// A directory entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct UserConfig {
    pub username: String,

    #[serde(default)]
    pub authorities: Vec<String>,

    /// Must be stated explicitly; there is no implicit "active" entry.
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub account_non_expired: bool,

    #[serde(default = "default_true")]
    pub credentials_non_expired: bool,

    #[serde(default = "default_true")]
    pub account_non_locked: bool,
}

const fn default_true() -> bool {
    true
}

impl UserConfig {
    #[must_use]
    pub fn to_record(&self) -> UserIdentityRecord {
        UserIdentityRecord::new(self.username.clone(), self.authorities.clone()).with_status(
            AccountStatus {
                enabled: self.enabled,
                account_non_expired: self.account_non_expired,
                credentials_non_expired: self.credentials_non_expired,
                account_non_locked: self.account_non_locked,
            },
        )
    }
}
