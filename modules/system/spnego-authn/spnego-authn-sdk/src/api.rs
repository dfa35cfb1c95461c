//! Public API trait for the SPNEGO `AuthN` provider.

use async_trait::async_trait;

use crate::error::AuthenticationError;
use crate::models::{AuthenticatedToken, AuthenticationRequest, RequestKind};

/// Public API trait for the SPNEGO `AuthN` provider.
///
/// Consumed by the request-handling layer once it has pulled a ticket out of
/// the transport:
///
/// ```ignore
/// let request = AuthenticationRequest::Spnego(
///     SpnegoRequestToken::new(ticket_bytes).with_details(details),
/// );
/// if authn.supports(request.kind()) {
///     let token = authn.authenticate(request).await?;
///     // token.response_token() goes back to the client
/// }
/// ```
///
/// Dropping the returned future cancels the attempt; the provider holds no
/// state that outlives it.
#[async_trait]
pub trait SpnegoAuthNClient: Send + Sync {
    /// Whether this provider handles requests of `kind`.
    fn supports(&self, kind: RequestKind) -> bool;

    /// Authenticate a SPNEGO request and return the authorized identity.
    ///
    /// # Errors
    ///
    /// - `UnsupportedRequest` if the request is not a SPNEGO request
    /// - `TicketValidation` if the ticket is invalid, expired, or malformed
    /// - `UserNotFound` if no identity exists for the validated principal
    /// - `AccountStatus` if the account is disabled, locked, or expired
    /// - `ExtensibilityCheck` or any other error raised by the deployment hook
    async fn authenticate(
        &self,
        request: AuthenticationRequest,
    ) -> Result<AuthenticatedToken, AuthenticationError>;
}
