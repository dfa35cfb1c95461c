//! Local (in-process) client for the SPNEGO `AuthN` provider.

use std::sync::Arc;

use async_trait::async_trait;
use spnego_authn_sdk::{
    AuthenticatedToken, AuthenticationError, AuthenticationRequest, RequestKind,
    SpnegoAuthNClient,
};

use tokio_util::sync::CancellationToken;

use super::Service;

/// Local client wrapping the service.
///
/// This is the `SpnegoAuthNClient` handed to the request-handling layer.
pub struct SpnegoAuthNLocalClient {
    svc: Arc<Service>,
}

impl SpnegoAuthNLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }

    /// [`SpnegoAuthNClient::authenticate`] bounded by the request layer's
    /// cancellation signal. See [`Service::authenticate_with_cancel`].
    ///
    /// # Errors
    ///
    /// Same as [`Service::authenticate_with_cancel`].
    pub async fn authenticate_with_cancel(
        &self,
        request: AuthenticationRequest,
        cancel: &CancellationToken,
    ) -> Result<AuthenticatedToken, AuthenticationError> {
        self.svc
            .authenticate_with_cancel(request, cancel)
            .await
            .map_err(|e| log_failure("authenticate_with_cancel", e))
    }
}

fn log_failure(op: &str, e: AuthenticationError) -> AuthenticationError {
    match &e {
        AuthenticationError::ServiceUnavailable(_) | AuthenticationError::Internal(_) => {
            tracing::error!(operation = op, error = %e, "spnego_authn call failed");
        }
        _ => tracing::info!(operation = op, error = %e, "spnego_authn rejected request"),
    }
    e
}

#[async_trait]
impl SpnegoAuthNClient for SpnegoAuthNLocalClient {
    fn supports(&self, kind: RequestKind) -> bool {
        Service::supports(kind)
    }

    async fn authenticate(
        &self,
        request: AuthenticationRequest,
    ) -> Result<AuthenticatedToken, AuthenticationError> {
        self.svc
            .authenticate(request)
            .await
            .map_err(|e| log_failure("authenticate", e))
    }
}
