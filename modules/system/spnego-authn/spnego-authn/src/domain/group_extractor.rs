//! Role extraction from PAC logon info.

use async_trait::async_trait;
use spnego_authn_sdk::{
    AccountStatus, AuthenticationError, RoleExtractor, UserIdentityRecord, ValidationResult,
};

use crate::config::RoleExtractionConfig;

/// Builds the user identity straight from the ticket's PAC group SIDs.
///
/// Yields nothing when the validator decoded no logon info, which sends the
/// provider to the directory.
#[derive(Debug, Clone)]
pub struct LogonInfoRoleExtractor {
    authority_prefix: String,
    include_extra_sids: bool,
    trust_ticket_account_status: bool,
}

impl LogonInfoRoleExtractor {
    #[must_use]
    pub fn from_config(cfg: &RoleExtractionConfig) -> Self {
        Self {
            authority_prefix: cfg.authority_prefix.clone(),
            include_extra_sids: cfg.include_extra_sids,
            trust_ticket_account_status: cfg.trust_ticket_account_status,
        }
    }
}

impl Default for LogonInfoRoleExtractor {
    fn default() -> Self {
        Self::from_config(&RoleExtractionConfig::default())
    }
}

#[async_trait]
impl RoleExtractor for LogonInfoRoleExtractor {
    async fn extract(
        &self,
        validation: &ValidationResult,
    ) -> Result<Option<UserIdentityRecord>, AuthenticationError> {
        let Some(info) = validation.logon_info() else {
            return Ok(None);
        };

        let authorities = info
            .group_sids(self.include_extra_sids)
            .into_iter()
            .map(|sid| format!("{}{sid}", self.authority_prefix))
            .collect();

        let status = info.account_status().unwrap_or_else(|| {
            if self.trust_ticket_account_status {
                AccountStatus::active()
            } else {
                tracing::debug!(
                    username = %validation.username(),
                    "PAC carries no account control flags; marking account unverified"
                );
                AccountStatus::unverified()
            }
        });

        Ok(Some(
            UserIdentityRecord::new(validation.username(), authorities).with_status(status),
        ))
    }
}
