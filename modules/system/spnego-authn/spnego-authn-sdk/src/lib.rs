//! SPNEGO `AuthN` SDK
//!
//! This crate provides the public API for the `spnego_authn` module:
//!
//! - [`SpnegoAuthNClient`] - Public API trait for consumers
//! - [`TicketValidator`], [`RoleExtractor`], [`DirectoryLookup`],
//!   [`AccountStatusChecker`], [`AdditionalChecks`] - Capability traits for implementations
//! - [`SpnegoPrincipal`] - Validated Kerberos identity
//! - [`AuthenticatedToken`] - Authentication result model
//! - [`AuthenticationError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use spnego_authn_sdk::{AuthenticationRequest, SpnegoAuthNClient, SpnegoRequestToken};
//!
//! let token = authn
//!     .authenticate(AuthenticationRequest::Spnego(SpnegoRequestToken::new(ticket)))
//!     .await?;
//! let roles = token.authorities();
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod error;
pub mod logon_info;
pub mod models;
pub mod plugin_api;
pub mod principal;

// Re-export main types at crate root
pub use api::SpnegoAuthNClient;
pub use error::{
    AccountStatusError, AuthenticationError, ConfigurationError, DirectoryLookupError,
    PrincipalError, TicketValidationError,
};
pub use logon_info::LogonInfo;
pub use models::{
    AccountStatus, AuthenticatedToken, AuthenticationRequest, KerberosKey, KerberosSubject,
    RequestDetails, RequestKind, SpnegoRequestToken, UserIdentityRecord, ValidationResult,
};
pub use plugin_api::{
    AccountStatusChecker, AdditionalChecks, DirectoryLookup, NoAdditionalChecks, RoleExtractor,
    TicketValidator,
};
pub use principal::{DelegatedCredential, NameType, SpnegoPrincipal};
