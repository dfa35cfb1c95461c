//! Service implementation for the static SPNEGO `AuthN` plugin.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use anyhow::{Context, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use spnego_authn_sdk::{
    DelegatedCredential, DirectoryLookupError, KerberosSubject, LogonInfo, NameType,
    SpnegoPrincipal, TicketValidationError, UserIdentityRecord, ValidationResult,
};
use tracing::{debug, info, warn};

use crate::config::{StaticSpnegoPluginConfig, TicketMapping};

struct TicketEntry {
    principal: String,
    name_type: NameType,
    response_token: Option<Bytes>,
    logon_info: Option<LogonInfo>,
    delegate: bool,
}

impl TicketEntry {
    fn from_mapping(mapping: &TicketMapping) -> anyhow::Result<Self> {
        SpnegoPrincipal::new(mapping.principal.as_str())
            .with_context(|| format!("invalid principal '{}'", mapping.principal))?;

        let response_token = mapping
            .response_token
            .as_deref()
            .map(|token| STANDARD.decode(token))
            .transpose()
            .with_context(|| {
                format!(
                    "response_token for '{}' is not valid base64",
                    mapping.principal
                )
            })?
            .map(Bytes::from);

        Ok(Self {
            principal: mapping.principal.clone(),
            name_type: mapping.name_type.map(NameType::from).unwrap_or_default(),
            response_token,
            logon_info: mapping.logon_info.clone(),
            delegate: mapping.delegate,
        })
    }
}

/// Static ticket validator and directory.
///
/// Every ticket is checked against the configured set byte for byte; no
/// cryptography is involved.
pub struct Service {
    tickets: HashMap<Bytes, TicketEntry>,
    users: HashMap<String, UserIdentityRecord>,
}

impl Service {
    /// Create a service from plugin configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a ticket or response token is not valid base64, a
    /// ticket is empty or listed twice, a principal name does not parse, or a
    /// username is listed twice.
    pub fn from_config(cfg: &StaticSpnegoPluginConfig) -> anyhow::Result<Self> {
        let mut tickets = HashMap::with_capacity(cfg.tickets.len());
        for mapping in &cfg.tickets {
            let ticket = STANDARD.decode(&mapping.ticket).with_context(|| {
                format!("ticket for '{}' is not valid base64", mapping.principal)
            })?;
            if ticket.is_empty() {
                bail!("ticket for '{}' is empty", mapping.principal);
            }

            match tickets.entry(Bytes::from(ticket)) {
                Entry::Occupied(_) => bail!("duplicate ticket for '{}'", mapping.principal),
                Entry::Vacant(slot) => {
                    slot.insert(TicketEntry::from_mapping(mapping)?);
                }
            }
        }

        let mut users = HashMap::with_capacity(cfg.users.len());
        for user in &cfg.users {
            if users
                .insert(user.username.clone(), user.to_record())
                .is_some()
            {
                bail!("duplicate user '{}'", user.username);
            }
        }

        warn!(
            "Static SPNEGO plugin accepts configured tickets without cryptographic \
             validation. Do NOT use it in production."
        );
        info!(
            ticket_count = tickets.len(),
            user_count = users.len(),
            "Static SPNEGO plugin configured"
        );

        Ok(Self { tickets, users })
    }

    /// Validate a ticket against the configured set.
    ///
    /// # Errors
    ///
    /// - `Malformed` if the ticket is empty
    /// - `Rejected` if the ticket is not configured
    pub fn validate(&self, ticket: &[u8]) -> Result<ValidationResult, TicketValidationError> {
        if ticket.is_empty() {
            return Err(TicketValidationError::Malformed("empty ticket".to_owned()));
        }

        let entry = self
            .tickets
            .get(ticket)
            .ok_or_else(|| TicketValidationError::Rejected("unknown ticket".to_owned()))?;

        // The presented ticket stands in for the forwarded TGT.
        let delegated = entry
            .delegate
            .then(|| DelegatedCredential::new(ticket.to_vec()));
        let principal = SpnegoPrincipal::from_parts(
            entry.principal.as_str(),
            entry.name_type,
            delegated,
            entry.logon_info.clone(),
        )?;
        debug!(principal = %principal, "Static ticket accepted");

        let mut result =
            ValidationResult::new(principal.name()).with_subject(KerberosSubject::new(principal));
        if let Some(token) = &entry.response_token {
            result = result.with_response_token(token.clone());
        }
        Ok(result)
    }

    /// Look up a configured user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no user with this name is configured.
    pub fn load_by_username(
        &self,
        username: &str,
    ) -> Result<UserIdentityRecord, DirectoryLookupError> {
        self.users
            .get(username)
            .cloned()
            .ok_or_else(|| DirectoryLookupError::NotFound {
                username: username.to_owned(),
            })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use spnego_authn_sdk::AccountStatus;

    use super::*;
    use crate::config::UserConfig;

    fn mapping(ticket: &str, principal: &str) -> TicketMapping {
        TicketMapping {
            ticket: ticket.to_owned(),
            principal: principal.to_owned(),
            name_type: None,
            response_token: None,
            logon_info: None,
            delegate: false,
        }
    }

    fn user(username: &str, authorities: &[&str]) -> UserConfig {
        UserConfig {
            username: username.to_owned(),
            authorities: authorities.iter().map(|a| (*a).to_owned()).collect(),
            enabled: true,
            account_non_expired: true,
            credentials_non_expired: true,
            account_non_locked: true,
        }
    }

    #[test]
    fn configured_ticket_yields_principal_and_response_token() {
        let cfg = StaticSpnegoPluginConfig {
            tickets: vec![TicketMapping {
                response_token: Some(STANDARD.encode(b"resp")),
                name_type: Some(10),
                ..mapping(&STANDARD.encode(b"ticket-bob"), "bob@EXAMPLE.COM")
            }],
            users: vec![],
        };
        let service = Service::from_config(&cfg).unwrap();

        let result = service.validate(b"ticket-bob").unwrap();

        assert_eq!(result.username(), "bob@EXAMPLE.COM");
        assert_eq!(result.response_token(), Some(&b"resp"[..]));
        let principal = result.subject().unwrap().principal();
        assert_eq!(principal.name_type(), NameType::Enterprise);
        assert_eq!(principal.realm(), Some("EXAMPLE.COM"));
        assert!(principal.delegated_credential().is_none());
        assert!(result.logon_info().is_none());
    }

    #[test]
    fn delegate_attaches_credential_and_logon_info_is_kept() {
        let cfg = StaticSpnegoPluginConfig {
            tickets: vec![TicketMapping {
                delegate: true,
                logon_info: Some(LogonInfo {
                    user_name: "alice".to_owned(),
                    group_sids: vec!["S-1-5-21-1-512".to_owned()],
                    ..LogonInfo::default()
                }),
                ..mapping(&STANDARD.encode(b"ticket-alice"), "alice@EXAMPLE.COM")
            }],
            users: vec![],
        };
        let service = Service::from_config(&cfg).unwrap();

        let result = service.validate(b"ticket-alice").unwrap();

        let subject = result.subject().unwrap();
        assert_eq!(
            subject
                .delegated_credential()
                .map(DelegatedCredential::expose_material),
            Some(&b"ticket-alice"[..])
        );
        assert_eq!(
            result.logon_info().map(|i| i.user_name.as_str()),
            Some("alice")
        );
    }

    #[test]
    fn empty_ticket_is_malformed() {
        let service = Service::from_config(&StaticSpnegoPluginConfig::default()).unwrap();
        assert!(matches!(
            service.validate(b""),
            Err(TicketValidationError::Malformed(_))
        ));
    }

    #[test]
    fn unknown_ticket_is_rejected() {
        let cfg = StaticSpnegoPluginConfig {
            tickets: vec![mapping(&STANDARD.encode(b"known"), "bob@EXAMPLE.COM")],
            users: vec![],
        };
        let service = Service::from_config(&cfg).unwrap();

        assert!(matches!(
            service.validate(b"unknown"),
            Err(TicketValidationError::Rejected(_))
        ));
    }

    #[test]
    fn from_config_rejects_bad_entries() {
        let not_base64 = StaticSpnegoPluginConfig {
            tickets: vec![mapping("not base64!", "bob@EXAMPLE.COM")],
            users: vec![],
        };
        assert!(Service::from_config(&not_base64).is_err());

        let empty = StaticSpnegoPluginConfig {
            tickets: vec![mapping("", "bob@EXAMPLE.COM")],
            users: vec![],
        };
        assert!(Service::from_config(&empty).is_err());

        let bad_principal = StaticSpnegoPluginConfig {
            tickets: vec![mapping(&STANDARD.encode(b"t"), "bob@")],
            users: vec![],
        };
        assert!(Service::from_config(&bad_principal).is_err());

        let duplicate_ticket = StaticSpnegoPluginConfig {
            tickets: vec![
                mapping(&STANDARD.encode(b"t"), "bob@EXAMPLE.COM"),
                mapping(&STANDARD.encode(b"t"), "alice@EXAMPLE.COM"),
            ],
            users: vec![],
        };
        assert!(Service::from_config(&duplicate_ticket).is_err());

        let duplicate_user = StaticSpnegoPluginConfig {
            tickets: vec![],
            users: vec![user("bob", &[]), user("bob", &["ROLE_USER"])],
        };
        assert!(Service::from_config(&duplicate_user).is_err());
    }

    #[test]
    fn directory_returns_configured_users() {
        let cfg = StaticSpnegoPluginConfig {
            tickets: vec![],
            users: vec![UserConfig {
                account_non_locked: false,
                ..user("bob@EXAMPLE.COM", &["ROLE_USER"])
            }],
        };
        let service = Service::from_config(&cfg).unwrap();

        let record = service.load_by_username("bob@EXAMPLE.COM").unwrap();
        assert_eq!(record.authorities(), &["ROLE_USER"]);
        assert_eq!(
            record.status(),
            AccountStatus {
                account_non_locked: false,
                ..AccountStatus::active()
            }
        );

        assert_eq!(
            service.load_by_username("ghost").unwrap_err(),
            DirectoryLookupError::NotFound {
                username: "ghost".to_owned()
            }
        );
    }
}
