//! Capability traits consumed by the SPNEGO authentication provider.
//!
//! Implementations are injected into the provider and shared across
//! concurrent authentication attempts, so each must be `Send + Sync` and
//! handle its own synchronization. Validators and directories may block on
//! network I/O; the provider imposes no timeout of its own.

use async_trait::async_trait;

use crate::error::{
    AccountStatusError, AuthenticationError, DirectoryLookupError, TicketValidationError,
};
use crate::models::{SpnegoRequestToken, UserIdentityRecord, ValidationResult};

/// Validates raw Kerberos / SPNEGO tickets.
///
/// The cryptographic protocol lives behind this trait (GSS-API, SSPI, a
/// keytab-backed decoder, ...). Tickets are single-use, so the provider never
/// calls `validate` twice for the same attempt.
#[async_trait]
pub trait TicketValidator: Send + Sync {
    /// Validate `ticket` and return the authenticated principal.
    ///
    /// # Errors
    ///
    /// Any [`TicketValidationError`] for malformed, expired or unverifiable tickets.
    async fn validate(&self, ticket: &[u8]) -> Result<ValidationResult, TicketValidationError>;
}

/// Derives a full user identity from ticket authorization data.
///
/// Returning `Ok(None)` defers to the directory lookup. Returning a record,
/// even one with no authorities, makes that record authoritative for the
/// attempt.
#[async_trait]
pub trait RoleExtractor: Send + Sync {
    /// # Errors
    ///
    /// Errors are propagated to the caller unchanged.
    async fn extract(
        &self,
        validation: &ValidationResult,
    ) -> Result<Option<UserIdentityRecord>, AuthenticationError>;
}

/// Loads user identities from a directory (LDAP, database, static table).
#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    /// # Errors
    ///
    /// - `NotFound` if no identity exists for `username`
    /// - `Unavailable` if the directory cannot be reached
    async fn load_by_username(
        &self,
        username: &str,
    ) -> Result<UserIdentityRecord, DirectoryLookupError>;
}

/// Enforces account-status invariants on a resolved identity.
pub trait AccountStatusChecker: Send + Sync {
    /// # Errors
    ///
    /// The [`AccountStatusError`] matching the first violated invariant.
    fn check(&self, record: &UserIdentityRecord) -> Result<(), AccountStatusError>;
}

/// Deployment-specific veto applied after the account-status check.
#[async_trait]
pub trait AdditionalChecks: Send + Sync {
    /// # Errors
    ///
    /// Any [`AuthenticationError`]; it reaches the caller unchanged.
    async fn check(
        &self,
        record: &UserIdentityRecord,
        request: &SpnegoRequestToken,
    ) -> Result<(), AuthenticationError>;
}

/// The default hook: accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAdditionalChecks;

#[async_trait]
impl AdditionalChecks for NoAdditionalChecks {
    async fn check(
        &self,
        _record: &UserIdentityRecord,
        _request: &SpnegoRequestToken,
    ) -> Result<(), AuthenticationError> {
        Ok(())
    }
}
