//! Error types for the SPNEGO `AuthN` module.
//!
//! Every failure is terminal for the attempt it belongs to. Nothing in this
//! taxonomy is retried by the provider.

use thiserror::Error;

use crate::models::RequestKind;

/// Errors returned by [`SpnegoAuthNClient::authenticate`](crate::SpnegoAuthNClient::authenticate).
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// The request is not a SPNEGO request; the provider does not handle it.
    #[error("unsupported authentication request: {kind}")]
    UnsupportedRequest { kind: RequestKind },

    /// The ticket is malformed, expired, or could not be verified.
    #[error("ticket validation failed: {0}")]
    TicketValidation(#[from] TicketValidationError),

    /// The validated principal has no matching directory entry.
    #[error("user not found: {username}")]
    UserNotFound { username: String },

    /// The resolved identity is disabled, locked, or expired.
    #[error("account status check failed: {0}")]
    AccountStatus(#[from] AccountStatusError),

    /// A deployment-specific check vetoed the authentication.
    #[error("additional check rejected authentication: {0}")]
    ExtensibilityCheck(String),

    /// A backing service (directory, extractor) failed for a reason other than "not found".
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The caller cancelled the attempt.
    #[error("authentication cancelled")]
    Cancelled,

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Ticket validation failures reported by a [`TicketValidator`](crate::TicketValidator).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketValidationError {
    /// The token could not be decoded as a SPNEGO or Kerberos token.
    #[error("malformed ticket: {0}")]
    Malformed(String),

    /// The ticket lifetime has elapsed.
    #[error("ticket expired")]
    Expired,

    /// The ticket was not encrypted with a key this service holds.
    #[error("key mismatch: {0}")]
    KeyMismatch(String),

    /// The authenticator timestamp is outside the tolerated clock skew.
    #[error("clock skew too great: {skew_secs}s")]
    ClockSkew { skew_secs: u64 },

    /// The validator refused the ticket for any other reason.
    #[error("ticket rejected: {0}")]
    Rejected(String),
}

/// Account-status invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountStatusError {
    #[error("user account is disabled: {username}")]
    Disabled { username: String },

    #[error("user account is locked: {username}")]
    Locked { username: String },

    #[error("user account has expired: {username}")]
    AccountExpired { username: String },

    #[error("user credentials have expired: {username}")]
    CredentialsExpired { username: String },
}

/// Failures reported by a [`DirectoryLookup`](crate::DirectoryLookup).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryLookupError {
    #[error("no directory entry for '{username}'")]
    NotFound { username: String },

    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

impl From<DirectoryLookupError> for AuthenticationError {
    fn from(e: DirectoryLookupError) -> Self {
        match e {
            DirectoryLookupError::NotFound { username } => Self::UserNotFound { username },
            DirectoryLookupError::Unavailable(reason) => Self::ServiceUnavailable(reason),
        }
    }
}

/// Startup-time configuration failures. Distinct from per-request errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("{capability} must be specified")]
    MissingCapability { capability: &'static str },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors produced while parsing a Kerberos principal name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrincipalError {
    #[error("principal name is empty")]
    EmptyName,

    #[error("principal '{name}' has an empty realm")]
    EmptyRealm { name: String },

    #[error("principal '{name}' has an empty component")]
    EmptyComponent { name: String },

    #[error("principal '{name}' ends with a dangling escape")]
    DanglingEscape { name: String },
}

impl From<PrincipalError> for TicketValidationError {
    fn from(e: PrincipalError) -> Self {
        Self::Malformed(e.to_string())
    }
}
