//! Realm allow-list applied to the ticket-proved principal.

use std::collections::HashSet;

use spnego_authn_sdk::{AuthenticationError, SpnegoPrincipal, ValidationResult};

/// Rejects tickets whose validated principal is not in one of the allowed
/// realms. Realm names compare case-sensitively, as Kerberos does.
///
/// Runs on the [`ValidationResult`], before identity resolution, so a
/// directory or extractor cannot rename the identity into an allowed realm.
#[derive(Debug, Clone)]
pub struct RealmAllowList {
    realms: HashSet<String>,
}

impl RealmAllowList {
    #[must_use]
    pub fn new(realms: impl IntoIterator<Item = String>) -> Self {
        Self {
            realms: realms.into_iter().collect(),
        }
    }

    /// Check the realm of the principal the validator proved.
    ///
    /// Uses the subject's principal when the validator established one,
    /// otherwise parses the validated username.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::ExtensibilityCheck`] if the principal has
    /// no realm, its realm is not allowed, or its name does not parse.
    pub fn check(&self, validation: &ValidationResult) -> Result<(), AuthenticationError> {
        let parsed;
        let principal = match validation.subject() {
            Some(subject) => subject.principal(),
            None => {
                parsed = SpnegoPrincipal::new(validation.username()).map_err(|e| {
                    AuthenticationError::ExtensibilityCheck(format!("invalid principal name: {e}"))
                })?;
                &parsed
            }
        };

        match principal.realm() {
            Some(realm) if self.realms.contains(realm) => Ok(()),
            Some(realm) => Err(AuthenticationError::ExtensibilityCheck(format!(
                "realm '{realm}' is not allowed"
            ))),
            None => Err(AuthenticationError::ExtensibilityCheck(format!(
                "principal '{}' has no realm",
                principal.name()
            ))),
        }
    }
}
