//! Kerberos identity value types.
//!
//! [`SpnegoPrincipal`] is the validated identity of the client. It may carry
//! the client's delegated credential and the logon info decoded from the
//! ticket's authorization data; neither takes part in equality.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::time::SystemTime;

use secrecy::{ExposeSecret, SecretSlice};

use crate::error::PrincipalError;
use crate::logon_info::LogonInfo;

const REALM_SEPARATOR: char = '@';
const COMPONENT_SEPARATOR: char = '/';
const ESCAPE: char = '\\';

/// Kerberos principal name types (RFC 4120 section 6.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameType {
    Unknown,
    /// Just the name of the principal as in DCE, or for users.
    #[default]
    Principal,
    SrvInst,
    SrvHst,
    SrvXhst,
    Uid,
    Enterprise,
    /// A code outside the well-known set, carried through as-is.
    Other(i32),
}

impl NameType {
    /// The wire code of this name type.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Principal => 1,
            Self::SrvInst => 2,
            Self::SrvHst => 3,
            Self::SrvXhst => 4,
            Self::Uid => 5,
            Self::Enterprise => 10,
            Self::Other(code) => code,
        }
    }
}

impl From<i32> for NameType {
    fn from(code: i32) -> Self {
        match code {
            0 => Self::Unknown,
            1 => Self::Principal,
            2 => Self::SrvInst,
            3 => Self::SrvHst,
            4 => Self::SrvXhst,
            5 => Self::Uid,
            10 => Self::Enterprise,
            other => Self::Other(other),
        }
    }
}

/// A forwardable credential the client delegated to this service.
///
/// Owned by exactly one [`SpnegoPrincipal`]. Not `Clone`; `Debug` redacts the
/// credential material.
#[derive(Debug)]
pub struct DelegatedCredential {
    material: SecretSlice<u8>,
    expires_at: Option<SystemTime>,
}

impl DelegatedCredential {
    #[must_use]
    pub fn new(material: Vec<u8>) -> Self {
        Self {
            material: material.into(),
            expires_at: None,
        }
    }

    #[must_use]
    pub fn with_expiry(mut self, expires_at: SystemTime) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Raw credential material, for handing to a GSS-API implementation.
    #[must_use]
    pub fn expose_material(&self) -> &[u8] {
        self.material.expose_secret()
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<SystemTime> {
        self.expires_at
    }

    /// Whether the credential is no longer usable at `now`.
    /// Credentials without a recorded expiry never report as expired.
    #[must_use]
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// The authenticated Kerberos principal.
///
/// Equality and hashing use the name and name type only. Two principals for
/// the same identity compare equal whether or not either carries a delegated
/// credential or logon info.
#[derive(Debug)]
pub struct SpnegoPrincipal {
    name: String,
    name_type: NameType,
    components: Vec<String>,
    realm: Option<String>,
    delegated_credential: Option<DelegatedCredential>,
    logon_info: Option<LogonInfo>,
}

impl SpnegoPrincipal {
    /// Parse a principal name with the default [`NameType::Principal`] type.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalError`] if the name is empty, has an empty component
    /// or realm, or ends with an unterminated escape.
    pub fn new(name: impl Into<String>) -> Result<Self, PrincipalError> {
        Self::from_parts(name, NameType::default(), None, None)
    }

    /// Build a principal from all of its parts.
    ///
    /// # Errors
    ///
    /// Same as [`SpnegoPrincipal::new`].
    pub fn from_parts(
        name: impl Into<String>,
        name_type: NameType,
        delegated_credential: Option<DelegatedCredential>,
        logon_info: Option<LogonInfo>,
    ) -> Result<Self, PrincipalError> {
        let name = name.into();
        let (components, realm) = parse_name(&name)?;
        Ok(Self {
            name,
            name_type,
            components,
            realm,
            delegated_credential,
            logon_info,
        })
    }

    #[must_use]
    pub fn with_name_type(mut self, name_type: NameType) -> Self {
        self.name_type = name_type;
        self
    }

    #[must_use]
    pub fn with_delegated_credential(mut self, credential: DelegatedCredential) -> Self {
        self.delegated_credential = Some(credential);
        self
    }

    #[must_use]
    pub fn with_logon_info(mut self, logon_info: LogonInfo) -> Self {
        self.logon_info = Some(logon_info);
        self
    }

    /// The full principal name as presented, escapes included.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn name_type(&self) -> NameType {
        self.name_type
    }

    /// The realm after the first unescaped `@`, if the name has one.
    #[must_use]
    pub fn realm(&self) -> Option<&str> {
        self.realm.as_deref()
    }

    /// Unescaped name components, realm excluded.
    #[must_use]
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// First name component (the user name for user principals).
    #[must_use]
    pub fn primary(&self) -> &str {
        self.components.first().map_or("", String::as_str)
    }

    /// Second name component (the host for service principals), if present.
    #[must_use]
    pub fn instance(&self) -> Option<&str> {
        self.components.get(1).map(String::as_str)
    }

    #[must_use]
    pub fn delegated_credential(&self) -> Option<&DelegatedCredential> {
        self.delegated_credential.as_ref()
    }

    /// Logon info from the PAC, when the ticket was issued by a directory
    /// that embeds one.
    #[must_use]
    pub fn logon_info(&self) -> Option<&LogonInfo> {
        self.logon_info.as_ref()
    }
}

impl PartialEq for SpnegoPrincipal {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.name_type.code() == other.name_type.code()
    }
}

impl Eq for SpnegoPrincipal {}

impl Hash for SpnegoPrincipal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.name_type.code().hash(state);
    }
}

impl fmt::Display for SpnegoPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'b' => '\u{8}',
        '0' => '\0',
        other => other,
    }
}

fn parse_name(name: &str) -> Result<(Vec<String>, Option<String>), PrincipalError> {
    if name.is_empty() {
        return Err(PrincipalError::EmptyName);
    }

    let mut components = Vec::new();
    let mut current = String::new();
    let mut in_realm = false;
    let mut chars = name.chars();

    while let Some(ch) = chars.next() {
        match ch {
            ESCAPE => {
                let Some(escaped) = chars.next() else {
                    return Err(PrincipalError::DanglingEscape {
                        name: name.to_owned(),
                    });
                };
                current.push(unescape(escaped));
            }
            COMPONENT_SEPARATOR if !in_realm => components.push(mem::take(&mut current)),
            REALM_SEPARATOR if !in_realm => {
                components.push(mem::take(&mut current));
                in_realm = true;
            }
            other => current.push(other),
        }
    }

    let realm = if in_realm {
        if current.is_empty() {
            return Err(PrincipalError::EmptyRealm {
                name: name.to_owned(),
            });
        }
        Some(current)
    } else {
        components.push(current);
        None
    };

    if components.iter().any(String::is_empty) {
        return Err(PrincipalError::EmptyComponent {
            name: name.to_owned(),
        });
    }

    Ok((components, realm))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::time::Duration;

    use super::*;

    fn hash_of(p: &SpnegoPrincipal) -> u64 {
        let mut hasher = DefaultHasher::new();
        p.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn user_principal_exposes_realm_and_default_type() {
        let p = SpnegoPrincipal::new("alice@EXAMPLE.COM").unwrap();

        assert_eq!(p.name(), "alice@EXAMPLE.COM");
        assert_eq!(p.realm(), Some("EXAMPLE.COM"));
        assert_eq!(p.name_type(), NameType::Principal);
        assert_eq!(p.name_type().code(), 1);
        assert_eq!(p.primary(), "alice");
        assert_eq!(p.instance(), None);
        assert!(p.delegated_credential().is_none());
        assert!(p.logon_info().is_none());
    }

    #[test]
    fn service_principal_splits_components() {
        let p = SpnegoPrincipal::new("HTTP/web.example.com@EXAMPLE.COM")
            .unwrap()
            .with_name_type(NameType::SrvHst);

        assert_eq!(p.components(), &["HTTP", "web.example.com"]);
        assert_eq!(p.primary(), "HTTP");
        assert_eq!(p.instance(), Some("web.example.com"));
        assert_eq!(p.realm(), Some("EXAMPLE.COM"));
        assert_eq!(p.name_type().code(), 3);
    }

    #[test]
    fn escaped_separators_stay_in_component() {
        let p = SpnegoPrincipal::new(r"alice\@corp.example.com@EXAMPLE.COM")
            .unwrap()
            .with_name_type(NameType::Enterprise);

        assert_eq!(p.primary(), "alice@corp.example.com");
        assert_eq!(p.realm(), Some("EXAMPLE.COM"));
    }

    #[test]
    fn name_without_realm_has_no_realm() {
        let p = SpnegoPrincipal::new("bob").unwrap();
        assert_eq!(p.realm(), None);
        assert_eq!(p.primary(), "bob");
    }

    #[test]
    fn invalid_names_are_rejected() {
        assert_eq!(SpnegoPrincipal::new("").unwrap_err(), PrincipalError::EmptyName);
        assert!(matches!(
            SpnegoPrincipal::new("alice@").unwrap_err(),
            PrincipalError::EmptyRealm { .. }
        ));
        assert!(matches!(
            SpnegoPrincipal::new("@EXAMPLE.COM").unwrap_err(),
            PrincipalError::EmptyComponent { .. }
        ));
        assert!(matches!(
            SpnegoPrincipal::new("HTTP//host@EXAMPLE.COM").unwrap_err(),
            PrincipalError::EmptyComponent { .. }
        ));
        assert!(matches!(
            SpnegoPrincipal::new("alice\\").unwrap_err(),
            PrincipalError::DanglingEscape { .. }
        ));
    }

    #[test]
    fn equality_ignores_credential_and_logon_info() {
        let plain = SpnegoPrincipal::new("alice@EXAMPLE.COM").unwrap();
        let delegated = SpnegoPrincipal::from_parts(
            "alice@EXAMPLE.COM",
            NameType::Principal,
            Some(DelegatedCredential::new(vec![1, 2, 3])),
            Some(LogonInfo::default()),
        )
        .unwrap();

        assert_eq!(plain, delegated);
        assert_eq!(hash_of(&plain), hash_of(&delegated));
    }

    #[test]
    fn equality_uses_name_type() {
        let user = SpnegoPrincipal::new("host@EXAMPLE.COM").unwrap();
        let service = SpnegoPrincipal::new("host@EXAMPLE.COM")
            .unwrap()
            .with_name_type(NameType::SrvInst);
        assert_ne!(user, service);

        let from_code = SpnegoPrincipal::new("host@EXAMPLE.COM")
            .unwrap()
            .with_name_type(NameType::Other(1));
        assert_eq!(user, from_code);
    }

    #[test]
    fn name_type_round_trips_codes() {
        for code in [0, 1, 2, 3, 4, 5, 10, 42] {
            assert_eq!(NameType::from(code).code(), code);
        }
        assert_eq!(NameType::from(42), NameType::Other(42));
    }

    #[test]
    fn delegated_credential_is_redacted_and_expires() {
        let now = SystemTime::now();
        let cred = DelegatedCredential::new(b"forwarded-tgt".to_vec())
            .with_expiry(now + Duration::from_secs(60));

        assert_eq!(cred.expose_material(), b"forwarded-tgt");
        assert!(!cred.is_expired_at(now));
        assert!(cred.is_expired_at(now + Duration::from_secs(61)));
        assert!(!format!("{cred:?}").contains("forwarded"));
        assert!(!DelegatedCredential::new(vec![1]).is_expired_at(now));
    }

    #[test]
    fn display_is_the_name() {
        let p = SpnegoPrincipal::new("carol@EXAMPLE.COM").unwrap();
        assert_eq!(p.to_string(), "carol@EXAMPLE.COM");
    }
}
