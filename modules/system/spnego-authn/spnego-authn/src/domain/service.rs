//! The SPNEGO authentication provider.

use std::sync::Arc;

use spnego_authn_sdk::{
    AccountStatusChecker, AdditionalChecks, AuthenticatedToken, AuthenticationError,
    AuthenticationRequest, ConfigurationError, DirectoryLookup, NoAdditionalChecks, RequestKind,
    RoleExtractor, TicketValidationError, TicketValidator, UserIdentityRecord, ValidationResult,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::account_status::DefaultAccountStatusChecker;
use super::group_extractor::LogonInfoRoleExtractor;
use super::realm_check::RealmAllowList;
use crate::config::SpnegoAuthNConfig;

/// Where the resolved identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdentitySource {
    AuthorizationData,
    Directory,
}

impl IdentitySource {
    fn as_str(self) -> &'static str {
        match self {
            Self::AuthorizationData => "authorization_data",
            Self::Directory => "directory",
        }
    }
}

/// SPNEGO authentication provider.
///
/// Validates the ticket, applies the realm allow-list to the validated
/// principal, resolves the identity (authorization data first, directory
/// second, never both), enforces account status, runs the deployment hook and
/// builds the [`AuthenticatedToken`]. Holds no mutable state; one instance
/// serves any number of concurrent attempts.
pub struct Service {
    ticket_validator: Arc<dyn TicketValidator>,
    directory: Arc<dyn DirectoryLookup>,
    realm_allow_list: Option<RealmAllowList>,
    role_extractor: Option<Arc<dyn RoleExtractor>>,
    status_checker: Arc<dyn AccountStatusChecker>,
    additional_checks: Arc<dyn AdditionalChecks>,
}

impl Service {
    #[must_use]
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::default()
    }

    /// Build a provider from module configuration.
    ///
    /// Installs [`LogonInfoRoleExtractor`] when role extraction is enabled and
    /// [`RealmAllowList`] when `allowed_realms` is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the configuration is invalid.
    pub fn from_config(
        cfg: &SpnegoAuthNConfig,
        ticket_validator: Arc<dyn TicketValidator>,
        directory: Arc<dyn DirectoryLookup>,
    ) -> Result<Self, ConfigurationError> {
        cfg.validate()?;

        let mut builder = Self::builder()
            .ticket_validator(ticket_validator)
            .directory_lookup(directory);

        if cfg.role_extraction.enabled {
            builder = builder.role_extractor(Arc::new(LogonInfoRoleExtractor::from_config(
                &cfg.role_extraction,
            )));
        }
        if !cfg.allowed_realms.is_empty() {
            builder = builder.realm_allow_list(RealmAllowList::new(
                cfg.allowed_realms.iter().cloned(),
            ));
        }

        builder.build()
    }

    /// Whether this provider handles requests of `kind`.
    #[must_use]
    pub const fn supports(kind: RequestKind) -> bool {
        matches!(kind, RequestKind::Spnego)
    }

    /// Authenticate a SPNEGO request.
    ///
    /// # Errors
    ///
    /// - `UnsupportedRequest` for non-SPNEGO requests
    /// - `TicketValidation` if the validator rejects the ticket
    /// - `ExtensibilityCheck` if the validated principal is outside the allowed realms
    /// - `UserNotFound` / `ServiceUnavailable` from the directory
    /// - `AccountStatus` if the resolved account is locked, disabled or expired
    /// - whatever the extractor or the additional checks return
    #[tracing::instrument(skip_all, fields(kind = %request.kind(), username))]
    pub async fn authenticate(
        &self,
        request: AuthenticationRequest,
    ) -> Result<AuthenticatedToken, AuthenticationError> {
        let token = match request {
            AuthenticationRequest::Spnego(token) => token,
            AuthenticationRequest::Bearer { .. } => {
                return Err(AuthenticationError::UnsupportedRequest {
                    kind: RequestKind::Bearer,
                });
            }
        };

        debug!(ticket_len = token.ticket().len(), "Validating Kerberos ticket");
        let validation = self
            .ticket_validator
            .validate(token.ticket())
            .await
            .map_err(|e| {
                warn!(error = %e, "Kerberos ticket rejected");
                AuthenticationError::from(e)
            })?;

        if validation.username().is_empty() {
            warn!("Ticket validator returned an empty principal name");
            return Err(TicketValidationError::Rejected(
                "validator returned an empty principal name".to_owned(),
            )
            .into());
        }
        tracing::Span::current().record("username", validation.username());
        debug!("Successfully validated ticket");

        if let Some(allow_list) = &self.realm_allow_list {
            allow_list.check(&validation).inspect_err(|e| {
                warn!(error = %e, "Principal realm rejected");
            })?;
        }

        let (record, source) = self.resolve_identity(&validation).await?;
        debug!(
            source = source.as_str(),
            authority_count = record.authorities().len(),
            "Resolved user identity"
        );

        self.status_checker.check(&record).map_err(|e| {
            warn!(error = %e, source = source.as_str(), "Account status check failed");
            AuthenticationError::from(e)
        })?;

        self.additional_checks.check(&record, &token).await?;

        let (ticket, details) = token.into_parts();
        Ok(AuthenticatedToken::new(record, ticket, validation, details))
    }

    /// Like [`Service::authenticate`], but gives up with
    /// [`AuthenticationError::Cancelled`] once `cancel` fires.
    ///
    /// Cancellation reaches the capabilities by dropping the pipeline future:
    /// the in-flight validator, extractor, directory or hook future is dropped
    /// with it, so capabilities release their I/O through their own `Drop`.
    /// No token is produced for a cancelled attempt.
    ///
    /// # Errors
    ///
    /// Same as [`Service::authenticate`], plus `Cancelled`.
    pub async fn authenticate_with_cancel(
        &self,
        request: AuthenticationRequest,
        cancel: &CancellationToken,
    ) -> Result<AuthenticatedToken, AuthenticationError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("Authentication cancelled by caller");
                Err(AuthenticationError::Cancelled)
            }
            result = self.authenticate(request) => result,
        }
    }

    async fn resolve_identity(
        &self,
        validation: &ValidationResult,
    ) -> Result<(UserIdentityRecord, IdentitySource), AuthenticationError> {
        if let Some(extractor) = &self.role_extractor
            && let Some(record) = extractor.extract(validation).await?
        {
            return Ok((record, IdentitySource::AuthorizationData));
        }

        let record = self
            .directory
            .load_by_username(validation.username())
            .await
            .map_err(|e| {
                warn!(error = %e, "Directory lookup failed");
                AuthenticationError::from(e)
            })?;
        Ok((record, IdentitySource::Directory))
    }
}

/// Assembles a [`Service`]. [`ServiceBuilder::build`] is the startup check.
#[derive(Default)]
pub struct ServiceBuilder {
    ticket_validator: Option<Arc<dyn TicketValidator>>,
    directory: Option<Arc<dyn DirectoryLookup>>,
    realm_allow_list: Option<RealmAllowList>,
    role_extractor: Option<Arc<dyn RoleExtractor>>,
    status_checker: Option<Arc<dyn AccountStatusChecker>>,
    additional_checks: Option<Arc<dyn AdditionalChecks>>,
}

impl ServiceBuilder {
    /// Required.
    #[must_use]
    pub fn ticket_validator(mut self, validator: Arc<dyn TicketValidator>) -> Self {
        self.ticket_validator = Some(validator);
        self
    }

    /// Required.
    #[must_use]
    pub fn directory_lookup(mut self, directory: Arc<dyn DirectoryLookup>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Optional. Checked against the validated principal, before identity
    /// resolution.
    #[must_use]
    pub fn realm_allow_list(mut self, allow_list: RealmAllowList) -> Self {
        self.realm_allow_list = Some(allow_list);
        self
    }

    /// Optional. Without one, every identity comes from the directory.
    #[must_use]
    pub fn role_extractor(mut self, extractor: Arc<dyn RoleExtractor>) -> Self {
        self.role_extractor = Some(extractor);
        self
    }

    /// Defaults to [`DefaultAccountStatusChecker`].
    #[must_use]
    pub fn status_checker(mut self, checker: Arc<dyn AccountStatusChecker>) -> Self {
        self.status_checker = Some(checker);
        self
    }

    /// Defaults to [`NoAdditionalChecks`].
    #[must_use]
    pub fn additional_checks(mut self, checks: Arc<dyn AdditionalChecks>) -> Self {
        self.additional_checks = Some(checks);
        self
    }

    /// Verify that the required capabilities are set and build the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingCapability`] if the ticket
    /// validator or the directory lookup is missing.
    pub fn build(self) -> Result<Service, ConfigurationError> {
        let ticket_validator =
            self.ticket_validator
                .ok_or(ConfigurationError::MissingCapability {
                    capability: "ticket_validator",
                })?;
        let directory = self
            .directory
            .ok_or(ConfigurationError::MissingCapability {
                capability: "directory_lookup",
            })?;

        tracing::info!(
            realm_allow_list = self.realm_allow_list.is_some(),
            role_extractor = self.role_extractor.is_some(),
            custom_status_checker = self.status_checker.is_some(),
            additional_checks = self.additional_checks.is_some(),
            "SPNEGO authentication provider configured"
        );

        Ok(Service {
            ticket_validator,
            directory,
            realm_allow_list: self.realm_allow_list,
            role_extractor: self.role_extractor,
            status_checker: self
                .status_checker
                .unwrap_or_else(|| Arc::new(DefaultAccountStatusChecker)),
            additional_checks: self
                .additional_checks
                .unwrap_or_else(|| Arc::new(NoAdditionalChecks)),
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use async_trait::async_trait;
    use spnego_authn_sdk::{DirectoryLookupError, SpnegoRequestToken};

    use super::*;

    struct RejectingValidator;

    #[async_trait]
    impl TicketValidator for RejectingValidator {
        async fn validate(
            &self,
            _ticket: &[u8],
        ) -> Result<ValidationResult, TicketValidationError> {
            Err(TicketValidationError::Expired)
        }
    }

    struct EmptyNameValidator;

    #[async_trait]
    impl TicketValidator for EmptyNameValidator {
        async fn validate(
            &self,
            _ticket: &[u8],
        ) -> Result<ValidationResult, TicketValidationError> {
            Ok(ValidationResult::new(""))
        }
    }

    struct EmptyDirectory;

    #[async_trait]
    impl DirectoryLookup for EmptyDirectory {
        async fn load_by_username(
            &self,
            username: &str,
        ) -> Result<UserIdentityRecord, DirectoryLookupError> {
            Err(DirectoryLookupError::NotFound {
                username: username.to_owned(),
            })
        }
    }

    #[test]
    fn build_requires_ticket_validator() {
        let result = Service::builder()
            .directory_lookup(Arc::new(EmptyDirectory))
            .build();
        assert_eq!(
            result.err(),
            Some(ConfigurationError::MissingCapability {
                capability: "ticket_validator"
            })
        );
    }

    #[test]
    fn build_requires_directory_lookup() {
        let result = Service::builder()
            .ticket_validator(Arc::new(RejectingValidator))
            .build();
        assert_eq!(
            result.err(),
            Some(ConfigurationError::MissingCapability {
                capability: "directory_lookup"
            })
        );
    }

    #[test]
    fn from_config_rejects_invalid_realms() {
        let cfg = SpnegoAuthNConfig {
            allowed_realms: vec![String::new()],
            ..SpnegoAuthNConfig::default()
        };
        let result = Service::from_config(
            &cfg,
            Arc::new(RejectingValidator),
            Arc::new(EmptyDirectory),
        );
        assert!(matches!(result, Err(ConfigurationError::Invalid(_))));
    }

    #[test]
    fn supports_only_spnego() {
        assert!(Service::supports(RequestKind::Spnego));
        assert!(!Service::supports(RequestKind::Bearer));
    }

    #[tokio::test]
    async fn empty_principal_name_is_a_validation_failure() {
        let svc = Service::builder()
            .ticket_validator(Arc::new(EmptyNameValidator))
            .directory_lookup(Arc::new(EmptyDirectory))
            .build()
            .unwrap();

        let result = svc
            .authenticate(SpnegoRequestToken::new(vec![1, 2]).into())
            .await;
        assert!(matches!(
            result,
            Err(AuthenticationError::TicketValidation(
                TicketValidationError::Rejected(_)
            ))
        ));
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let svc = Service::builder()
            .ticket_validator(Arc::new(RejectingValidator))
            .directory_lookup(Arc::new(EmptyDirectory))
            .build()
            .unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = svc
            .authenticate_with_cancel(SpnegoRequestToken::new(vec![1]).into(), &cancel)
            .await;
        assert!(matches!(result, Err(AuthenticationError::Cancelled)));
    }

    #[test]
    fn identity_source_labels() {
        assert_eq!(IdentitySource::AuthorizationData.as_str(), "authorization_data");
        assert_eq!(IdentitySource::Directory.as_str(), "directory");
    }
}
