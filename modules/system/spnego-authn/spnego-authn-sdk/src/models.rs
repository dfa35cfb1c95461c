//! Domain models for the SPNEGO `AuthN` module.

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

use bytes::Bytes;
use secrecy::{ExposeSecret, SecretSlice, SecretString};
use serde::{Deserialize, Serialize};

use crate::logon_info::LogonInfo;
use crate::principal::{DelegatedCredential, SpnegoPrincipal};

/// Discriminant of [`AuthenticationRequest`], used by `supports`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Spnego,
    Bearer,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Spnego => "spnego",
            Self::Bearer => "bearer",
        })
    }
}

/// Credentials extracted from an inbound request by the transport layer.
#[derive(Debug, Clone)]
pub enum AuthenticationRequest {
    /// A SPNEGO token or bare Kerberos AP-REQ.
    Spnego(SpnegoRequestToken),
    /// An opaque bearer token, handled by other providers.
    Bearer {
        token: SecretString,
        details: RequestDetails,
    },
}

impl AuthenticationRequest {
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Spnego(_) => RequestKind::Spnego,
            Self::Bearer { .. } => RequestKind::Bearer,
        }
    }

    #[must_use]
    pub fn details(&self) -> &RequestDetails {
        match self {
            Self::Spnego(token) => token.details(),
            Self::Bearer { details, .. } => details,
        }
    }
}

impl From<SpnegoRequestToken> for AuthenticationRequest {
    fn from(token: SpnegoRequestToken) -> Self {
        Self::Spnego(token)
    }
}

/// Per-request details threaded verbatim into the authenticated token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDetails {
    pub remote_address: Option<IpAddr>,
    pub session_id: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl RequestDetails {
    #[must_use]
    pub fn with_remote_address(mut self, addr: IpAddr) -> Self {
        self.remote_address = Some(addr);
        self
    }

    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Raw SPNEGO ticket as presented by the client.
#[derive(Clone)]
pub struct SpnegoRequestToken {
    ticket: Bytes,
    details: RequestDetails,
}

impl SpnegoRequestToken {
    #[must_use]
    pub fn new(ticket: impl Into<Bytes>) -> Self {
        Self {
            ticket: ticket.into(),
            details: RequestDetails::default(),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: RequestDetails) -> Self {
        self.details = details;
        self
    }

    #[must_use]
    pub fn ticket(&self) -> &[u8] {
        &self.ticket
    }

    #[must_use]
    pub fn details(&self) -> &RequestDetails {
        &self.details
    }

    /// Split into the ticket bytes and request details.
    #[must_use]
    pub fn into_parts(self) -> (Bytes, RequestDetails) {
        (self.ticket, self.details)
    }
}

impl fmt::Debug for SpnegoRequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpnegoRequestToken")
            .field("ticket", &format_args!("<{} bytes>", self.ticket.len()))
            .field("details", &self.details)
            .finish()
    }
}

/// A service key used to decrypt the ticket.
#[derive(Debug)]
pub struct KerberosKey {
    encryption_type: i32,
    version: u32,
    value: SecretSlice<u8>,
}

impl KerberosKey {
    #[must_use]
    pub fn new(encryption_type: i32, version: u32, value: Vec<u8>) -> Self {
        Self {
            encryption_type,
            version,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn encryption_type(&self) -> i32 {
        self.encryption_type
    }

    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub fn expose_value(&self) -> &[u8] {
        self.value.expose_secret()
    }
}

/// Security subject established during ticket validation.
///
/// Present only when the validator supports delegation or extended
/// validation. Owns the principal, and through it the delegated credential.
#[derive(Debug)]
pub struct KerberosSubject {
    principal: SpnegoPrincipal,
}

impl KerberosSubject {
    #[must_use]
    pub fn new(principal: SpnegoPrincipal) -> Self {
        Self { principal }
    }

    #[must_use]
    pub fn principal(&self) -> &SpnegoPrincipal {
        &self.principal
    }

    #[must_use]
    pub fn delegated_credential(&self) -> Option<&DelegatedCredential> {
        self.principal.delegated_credential()
    }

    #[must_use]
    pub fn into_principal(self) -> SpnegoPrincipal {
        self.principal
    }
}

/// Outcome of a successful ticket validation. Read-only to downstream stages.
pub struct ValidationResult {
    username: String,
    response_token: Option<Bytes>,
    subject: Option<KerberosSubject>,
    keys: Vec<KerberosKey>,
}

impl ValidationResult {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            response_token: None,
            subject: None,
            keys: Vec::new(),
        }
    }

    /// Token to send back to the client to complete mutual authentication.
    #[must_use]
    pub fn with_response_token(mut self, token: impl Into<Bytes>) -> Self {
        self.response_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_subject(mut self, subject: KerberosSubject) -> Self {
        self.subject = Some(subject);
        self
    }

    #[must_use]
    pub fn with_keys(mut self, keys: Vec<KerberosKey>) -> Self {
        self.keys = keys;
        self
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn response_token(&self) -> Option<&[u8]> {
        self.response_token.as_deref()
    }

    #[must_use]
    pub fn subject(&self) -> Option<&KerberosSubject> {
        self.subject.as_ref()
    }

    #[must_use]
    pub fn keys(&self) -> &[KerberosKey] {
        &self.keys
    }

    /// PAC logon info of the validated principal, if the validator decoded one.
    #[must_use]
    pub fn logon_info(&self) -> Option<&LogonInfo> {
        self.subject.as_ref().and_then(|s| s.principal().logon_info())
    }
}

impl fmt::Debug for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationResult")
            .field("username", &self.username)
            .field(
                "response_token",
                &self.response_token.as_ref().map(Bytes::len),
            )
            .field("subject", &self.subject)
            .field("keys", &self.keys)
            .finish()
    }
}

/// Account-status flags of a user identity.
///
/// The default is the unverified state: not enabled. A source that cannot
/// vouch for an account must not make it look active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct AccountStatus {
    pub enabled: bool,
    pub account_non_expired: bool,
    pub credentials_non_expired: bool,
    pub account_non_locked: bool,
}

impl AccountStatus {
    /// Enabled, unlocked, nothing expired.
    #[must_use]
    pub const fn active() -> Self {
        Self {
            enabled: true,
            account_non_expired: true,
            credentials_non_expired: true,
            account_non_locked: true,
        }
    }

    /// Status for an account nobody has vouched for.
    #[must_use]
    pub const fn unverified() -> Self {
        Self {
            enabled: false,
            ..Self::active()
        }
    }
}

impl Default for AccountStatus {
    fn default() -> Self {
        Self::unverified()
    }
}

/// Resolved user identity: name, granted authorities and account status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentityRecord {
    username: String,
    #[serde(default)]
    authorities: Vec<String>,
    #[serde(default)]
    status: AccountStatus,
}

impl UserIdentityRecord {
    /// New record with [`AccountStatus::unverified`] status.
    #[must_use]
    pub fn new(username: impl Into<String>, authorities: Vec<String>) -> Self {
        Self {
            username: username.into(),
            authorities,
            status: AccountStatus::unverified(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: AccountStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn authorities(&self) -> &[String] {
        &self.authorities
    }

    #[must_use]
    pub fn status(&self) -> AccountStatus {
        self.status
    }
}

/// The authenticated identity handed to the authorization layer.
///
/// Built once per successful authentication and never mutated.
#[derive(Debug)]
pub struct AuthenticatedToken {
    authorities: Vec<String>,
    ticket: Bytes,
    username: String,
    response_token: Option<Bytes>,
    subject: Option<KerberosSubject>,
    keys: Vec<KerberosKey>,
    details: RequestDetails,
}

impl AuthenticatedToken {
    /// Compose the token from the resolved record and the validated ticket.
    #[must_use]
    pub fn new(
        record: UserIdentityRecord,
        ticket: Bytes,
        validation: ValidationResult,
        details: RequestDetails,
    ) -> Self {
        Self {
            authorities: record.authorities,
            ticket,
            username: record.username,
            response_token: validation.response_token,
            subject: validation.subject,
            keys: validation.keys,
            details,
        }
    }

    #[must_use]
    pub fn authorities(&self) -> &[String] {
        &self.authorities
    }

    #[must_use]
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// The validated ticket exactly as presented.
    #[must_use]
    pub fn ticket(&self) -> &[u8] {
        &self.ticket
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn response_token(&self) -> Option<&[u8]> {
        self.response_token.as_deref()
    }

    #[must_use]
    pub fn subject(&self) -> Option<&KerberosSubject> {
        self.subject.as_ref()
    }

    /// The Kerberos principal, when the validator established a subject.
    #[must_use]
    pub fn principal(&self) -> Option<&SpnegoPrincipal> {
        self.subject.as_ref().map(KerberosSubject::principal)
    }

    #[must_use]
    pub fn keys(&self) -> &[KerberosKey] {
        &self.keys
    }

    #[must_use]
    pub fn details(&self) -> &RequestDetails {
        &self.details
    }
}
