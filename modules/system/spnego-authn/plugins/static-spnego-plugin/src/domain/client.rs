//! Capability implementations for the static SPNEGO `AuthN` plugin.
//!
//! Implements `TicketValidator` and `DirectoryLookup` using the domain service.

use async_trait::async_trait;
use spnego_authn_sdk::{
    DirectoryLookup, DirectoryLookupError, TicketValidationError, TicketValidator,
    UserIdentityRecord, ValidationResult,
};

use super::service::Service;

#[async_trait]
impl TicketValidator for Service {
    async fn validate(&self, ticket: &[u8]) -> Result<ValidationResult, TicketValidationError> {
        self.validate(ticket)
    }
}

#[async_trait]
impl DirectoryLookup for Service {
    async fn load_by_username(
        &self,
        username: &str,
    ) -> Result<UserIdentityRecord, DirectoryLookupError> {
        self.load_by_username(username)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    use super::*;
    use crate::config::{StaticSpnegoPluginConfig, TicketMapping};

    fn service() -> Service {
        Service::from_config(&StaticSpnegoPluginConfig {
            tickets: vec![TicketMapping {
                ticket: STANDARD.encode(b"t"),
                principal: "bob@EXAMPLE.COM".to_owned(),
                name_type: None,
                response_token: None,
                logon_info: None,
                delegate: false,
            }],
            users: vec![],
        })
        .unwrap()
    }

    #[tokio::test]
    async fn validator_trait_accepts_configured_ticket() {
        let service = service();
        let validator: &dyn TicketValidator = &service;

        let result = validator.validate(b"t").await.unwrap();
        assert_eq!(result.username(), "bob@EXAMPLE.COM");
    }

    #[tokio::test]
    async fn directory_trait_reports_missing_user() {
        let service = service();
        let directory: &dyn DirectoryLookup = &service;

        match directory.load_by_username("bob@EXAMPLE.COM").await.unwrap_err() {
            DirectoryLookupError::NotFound { username } => assert_eq!(username, "bob@EXAMPLE.COM"),
            other => panic!("Expected NotFound, got: {other:?}"),
        }
    }
}
