//! Configuration for the SPNEGO `AuthN` module.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use spnego_authn_sdk::ConfigurationError;

/// Environment variable prefix for overrides, e.g.
/// `SPNEGO_AUTHN__ROLE_EXTRACTION__ENABLED=false`.
pub const ENV_PREFIX: &str = "SPNEGO_AUTHN__";

/// Configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpnegoAuthNConfig {
    /// How identities are derived from PAC authorization data.
    pub role_extraction: RoleExtractionConfig,

    /// Realms whose principals may authenticate. Empty allows every realm.
    pub allowed_realms: Vec<String>,
}

/// Settings for the PAC group extractor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoleExtractionConfig {
    /// Install the extractor. When off, every identity comes from the directory.
    pub enabled: bool,

    /// Prefix prepended to each group SID to form an authority.
    pub authority_prefix: String,

    /// Include `ExtraSids` and resource group SIDs.
    pub include_extra_sids: bool,

    /// Treat a PAC without `UserAccountControl` flags as an active account.
    ///
    /// Off by default: such records are marked disabled and rejected by the
    /// account-status check.
    pub trust_ticket_account_status: bool,
}

impl Default for RoleExtractionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            authority_prefix: String::new(),
            include_extra_sids: true,
            trust_ticket_account_status: false,
        }
    }
}

impl SpnegoAuthNConfig {
    /// Load configuration from an optional YAML file, then apply
    /// [`ENV_PREFIX`] environment overrides on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed, a value has the wrong
    /// type, an unknown key is present, or [`SpnegoAuthNConfig::validate`] fails.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let cfg: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns [`ConfigurationError::Invalid`] if an allowed realm is empty or
    /// contains `@`.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for realm in &self.allowed_realms {
            if realm.is_empty() || realm.contains('@') {
                return Err(ConfigurationError::Invalid(format!(
                    "allowed_realms entry '{realm}' is not a realm name"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_enable_conservative_extraction() {
        let cfg = SpnegoAuthNConfig::default();
        assert!(cfg.role_extraction.enabled);
        assert!(cfg.role_extraction.include_extra_sids);
        assert!(!cfg.role_extraction.trust_ticket_account_status);
        assert!(cfg.role_extraction.authority_prefix.is_empty());
        assert!(cfg.allowed_realms.is_empty());
    }

    #[test]
    fn deserializes_partial_json() {
        let cfg: SpnegoAuthNConfig = serde_json::from_value(serde_json::json!({
            "role_extraction": { "authority_prefix": "ROLE_" },
            "allowed_realms": ["EXAMPLE.COM"]
        }))
        .unwrap();

        assert!(cfg.role_extraction.enabled);
        assert_eq!(cfg.role_extraction.authority_prefix, "ROLE_");
        assert_eq!(cfg.allowed_realms, ["EXAMPLE.COM"]);
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: Result<SpnegoAuthNConfig, _> = serde_json::from_value(serde_json::json!({
            "role_extraction": { "enabeld": false }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn loads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "role_extraction:\n  enabled: false\n  trust_ticket_account_status: true\nallowed_realms:\n  - EXAMPLE.COM\n  - CORP.EXAMPLE.COM"
        )
        .unwrap();

        let cfg = SpnegoAuthNConfig::load(Some(file.path())).unwrap();

        assert!(!cfg.role_extraction.enabled);
        assert!(cfg.role_extraction.trust_ticket_account_status);
        assert_eq!(cfg.allowed_realms, ["EXAMPLE.COM", "CORP.EXAMPLE.COM"]);
    }

    #[test]
    fn load_without_file_yields_defaults() {
        let cfg = SpnegoAuthNConfig::load(None).unwrap();
        assert_eq!(cfg, SpnegoAuthNConfig::default());
    }

    #[test]
    fn validate_rejects_bad_realms() {
        let cfg = SpnegoAuthNConfig {
            allowed_realms: vec!["alice@EXAMPLE.COM".to_owned()],
            ..SpnegoAuthNConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigurationError::Invalid(_))
        ));
    }
}
