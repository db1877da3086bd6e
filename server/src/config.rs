use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use lead_core::client::DEFAULT_BASE_URL;
use lead_core::SiteIdentity;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// What the caller sees when Follow Up Boss cannot be reached or refuses a
/// lead. Fixed for the lifetime of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayPolicy {
    /// Relay failure becomes a 502 carrying the upstream details.
    Strict,
    /// Relay failure is logged and acknowledged with `sentToFub: false`.
    Lenient,
}

impl FromStr for RelayPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(RelayPolicy::Strict),
            "lenient" => Ok(RelayPolicy::Lenient),
            other => Err(format!("expected `strict` or `lenient`, got `{other}`")),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// `None` keeps the server up but fails every submission with a 500.
    pub fub_api_key: Option<String>,
    pub fub_base_url: String,
    pub fub_system: String,
    pub fub_timeout: Duration,
    pub site: String,
    pub relay_policy: RelayPolicy,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present first.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let port: u16 = get_or("PORT", "3000")
            .parse()
            .map_err(|e| invalid("PORT", e))?;
        let timeout_ms: u64 = get_or("FUB_TIMEOUT_MS", "8000")
            .parse()
            .map_err(|e| invalid("FUB_TIMEOUT_MS", e))?;
        if timeout_ms == 0 {
            return Err(invalid("FUB_TIMEOUT_MS", "must be greater than zero"));
        }
        let relay_policy: RelayPolicy = get_or("LEAD_RELAY_POLICY", "strict")
            .parse()
            .map_err(|e| invalid("LEAD_RELAY_POLICY", e))?;

        Ok(Self {
            host: get_or("HOST", "0.0.0.0"),
            port,
            log_level: get_or("LOG_LEVEL", "info"),
            fub_api_key: lookup("FUB_API_KEY")
                .map(|key| key.trim().to_owned())
                .filter(|key| !key.is_empty()),
            fub_base_url: get_or("FUB_BASE_URL", DEFAULT_BASE_URL),
            fub_system: get_or("FUB_SYSTEM", "FromStart2Keys"),
            fub_timeout: Duration::from_millis(timeout_ms),
            site: get_or("LEAD_SITE", "FromStart2Keys.com"),
            relay_policy,
        })
    }

    /// Same as `from_lookup`, backed by a map. Handy in tests.
    pub fn from_map(vars: &HashMap<&str, &str>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).map(|value| (*value).to_owned()))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn identity(&self) -> SiteIdentity {
        SiteIdentity {
            site: self.site.clone(),
            system: self.fub_system.clone(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("fub_api_key", &self.fub_api_key.as_ref().map(|_| "<redacted>"))
            .field("fub_base_url", &self.fub_base_url)
            .field("fub_system", &self.fub_system)
            .field("fub_timeout", &self.fub_timeout)
            .field("site", &self.site)
            .field("relay_policy", &self.relay_policy)
            .finish()
    }
}

fn invalid(key: &'static str, message: impl fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        key,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = AppConfig::from_map(&HashMap::new()).expect("should parse config");
        assert_eq!(cfg.bind_addr(), "0.0.0.0:3000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.fub_api_key, None);
        assert_eq!(cfg.fub_base_url, "https://api.followupboss.com");
        assert_eq!(cfg.fub_timeout, Duration::from_secs(8));
        assert_eq!(cfg.relay_policy, RelayPolicy::Strict);
        assert_eq!(
            cfg.identity(),
            SiteIdentity {
                site: "FromStart2Keys.com".to_owned(),
                system: "FromStart2Keys".to_owned(),
            }
        );
    }

    #[test]
    fn explicit_values_override_defaults() {
        let vars = HashMap::from([
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("FUB_API_KEY", "  abc123 "),
            ("FUB_BASE_URL", "http://127.0.0.1:4010"),
            ("FUB_TIMEOUT_MS", "250"),
            ("LEAD_RELAY_POLICY", "Lenient"),
            ("LEAD_SITE", "example.com"),
        ]);
        let cfg = AppConfig::from_map(&vars).unwrap();
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8080");
        assert_eq!(cfg.fub_api_key.as_deref(), Some("abc123"));
        assert_eq!(cfg.fub_timeout, Duration::from_millis(250));
        assert_eq!(cfg.relay_policy, RelayPolicy::Lenient);
        assert_eq!(cfg.identity().site, "example.com");
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = AppConfig::from_map(&HashMap::from([("FUB_API_KEY", "   ")])).unwrap();
        assert_eq!(cfg.fub_api_key, None);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = AppConfig::from_map(&HashMap::from([("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = AppConfig::from_map(&HashMap::from([("FUB_TIMEOUT_MS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "FUB_TIMEOUT_MS", .. }));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err =
            AppConfig::from_map(&HashMap::from([("LEAD_RELAY_POLICY", "sometimes")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid LEAD_RELAY_POLICY: expected `strict` or `lenient`, got `sometimes`"
        );
    }

    #[test]
    fn debug_output_hides_api_key() {
        let cfg = AppConfig::from_map(&HashMap::from([("FUB_API_KEY", "abc123")])).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("abc123"));
        assert!(rendered.contains("<redacted>"));
    }
}
