//! SPNEGO `AuthN` Module
//!
//! Turns a Kerberos / SPNEGO ticket into an authorized identity:
//!
//! 1. the configured [`TicketValidator`](spnego_authn_sdk::TicketValidator) validates the ticket
//! 2. the identity comes from the ticket's authorization data when a
//!    [`RoleExtractor`](spnego_authn_sdk::RoleExtractor) yields one, otherwise from the
//!    [`DirectoryLookup`](spnego_authn_sdk::DirectoryLookup)
//! 3. account status and deployment checks run on the resolved identity
//! 4. an [`AuthenticatedToken`](spnego_authn_sdk::AuthenticatedToken) is built
//!
//! Provides the `SpnegoAuthNClient` implementation through
//! [`domain::SpnegoAuthNLocalClient`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

pub use config::SpnegoAuthNConfig;
pub use domain::{Service, ServiceBuilder, SpnegoAuthNLocalClient};
