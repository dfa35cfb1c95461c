#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static SPNEGO `AuthN` Plugin
//!
//! Provides a [`TicketValidator`](spnego_authn_sdk::TicketValidator) and a
//! [`DirectoryLookup`](spnego_authn_sdk::DirectoryLookup) backed by fixed
//! mappings from configuration. Intended for development and tests where no
//! KDC or directory is available.
//!
//! - **tickets**: each base64-encoded ticket maps to a principal, optionally
//!   with PAC logon info, a mutual-authentication response token, and a
//!   delegated credential.
//! - **users**: directory entries returned by username.
//!
//! ## Configuration
//!
//! ```yaml
//! modules:
//!   static_spnego_plugin:
//!     config:
//!       tickets:
//!         - ticket: "dGlja2V0LWJvYg=="
//!           principal: "bob@EXAMPLE.COM"
//!           response_token: "cmVzcA=="
//!         - ticket: "dGlja2V0LWFsaWNl"
//!           principal: "alice@EXAMPLE.COM"
//!           delegate: true
//!           logon_info:
//!             user_name: "alice"
//!             group_sids: ["S-1-5-21-1-512"]
//!             user_account_control: 0
//!       users:
//!         - username: "bob@EXAMPLE.COM"
//!           authorities: ["ROLE_USER"]
//!           enabled: true
//! ```

pub mod config;
pub mod domain;

pub use config::StaticSpnegoPluginConfig;
pub use domain::Service;
