//! Default account-status checker.

use spnego_authn_sdk::{AccountStatusChecker, AccountStatusError, UserIdentityRecord};

/// Rejects locked, disabled, expired and credential-expired accounts, in
/// that order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAccountStatusChecker;

impl AccountStatusChecker for DefaultAccountStatusChecker {
    fn check(&self, record: &UserIdentityRecord) -> Result<(), AccountStatusError> {
        let status = record.status();
        let username = || record.username().to_owned();

        if !status.account_non_locked {
            return Err(AccountStatusError::Locked {
                username: username(),
            });
        }
        if !status.enabled {
            return Err(AccountStatusError::Disabled {
                username: username(),
            });
        }
        if !status.account_non_expired {
            return Err(AccountStatusError::AccountExpired {
                username: username(),
            });
        }
        if !status.credentials_non_expired {
            return Err(AccountStatusError::CredentialsExpired {
                username: username(),
            });
        }
        Ok(())
    }
}
