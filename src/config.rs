//! Server configuration from environment variables.

use std::time::Duration;

/// Minimum length of `SESSION_SECRET`, as required for cookie key derivation.
pub const MIN_SESSION_SECRET_LEN: usize = 32;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// Variable present but not parseable.
    Invalid { var: &'static str, value: String },
    /// Variable required in production is missing.
    Missing(&'static str),
    /// Session secret shorter than `MIN_SESSION_SECRET_LEN`.
    SessionSecretTooShort,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid { var, value } => write!(f, "Invalid value for {}: {:?}", var, value),
            ConfigError::Missing(var) => write!(f, "Missing required environment variable {}", var),
            ConfigError::SessionSecretTooShort => write!(
                f,
                "SESSION_SECRET must be at least {} bytes",
                MIN_SESSION_SECRET_LEN
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    /// None in development means a random key per process (sessions do not survive restarts).
    pub session_secret: Option<String>,
    /// Shared secret the auth service presents when opening a session. Required in
    /// production; without it, development accepts any caller.
    pub auth_service_token: Option<String>,
    /// Completed or cancelled tournaments are dropped from memory this long after
    /// their last change. Running tournaments are never dropped.
    pub finished_retention: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::Development,
            session_secret: None,
            auth_service_token: None,
            finished_retention: Duration::from_secs(72 * 3600),
        }
    }
}

impl Config {
    /// Read HOST, PORT, APP_ENV, SESSION_SECRET, AUTH_SERVICE_TOKEN and
    /// FINISHED_RETENTION_HOURS.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = match lookup("APP_ENV").as_deref() {
            None | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "APP_ENV",
                    value: other.to_string(),
                })
            }
        };

        let port = match lookup("PORT") {
            Some(p) => p.parse().map_err(|_| ConfigError::Invalid { var: "PORT", value: p })?,
            None => defaults.port,
        };

        let finished_retention = match lookup("FINISHED_RETENTION_HOURS") {
            Some(h) => {
                let hours: u64 = h.parse().map_err(|_| ConfigError::Invalid {
                    var: "FINISHED_RETENTION_HOURS",
                    value: h,
                })?;
                Duration::from_secs(hours * 3600)
            }
            None => defaults.finished_retention,
        };

        let auth_service_token = lookup("AUTH_SERVICE_TOKEN").filter(|t| !t.is_empty());
        if auth_service_token.is_none() && environment == Environment::Production {
            return Err(ConfigError::Missing("AUTH_SERVICE_TOKEN"));
        }

        let session_secret = lookup("SESSION_SECRET");
        match &session_secret {
            Some(s) if s.len() < MIN_SESSION_SECRET_LEN => {
                return Err(ConfigError::SessionSecretTooShort)
            }
            None if environment == Environment::Production => {
                return Err(ConfigError::Missing("SESSION_SECRET"))
            }
            _ => {}
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            environment,
            session_secret,
            auth_service_token,
            finished_retention,
        })
    }

    /// Whether a caller presenting `token` may set a session identity.
    pub fn accepts_auth_token(&self, token: Option<&str>) -> bool {
        match &self.auth_service_token {
            Some(expected) => token == Some(expected.as_str()),
            None => self.environment == Environment::Development,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&'static str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<&str, String> = vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]).unwrap(), Config::default());
    }

    #[test]
    fn production_requires_secrets() {
        let token = ("AUTH_SERVICE_TOKEN", "auth-token");
        assert_eq!(
            config_from(&[("APP_ENV", "production"), token]),
            Err(ConfigError::Missing("SESSION_SECRET"))
        );
        let secret = "x".repeat(MIN_SESSION_SECRET_LEN);
        assert_eq!(
            config_from(&[("APP_ENV", "production"), ("SESSION_SECRET", &secret)]),
            Err(ConfigError::Missing("AUTH_SERVICE_TOKEN"))
        );
        let config =
            config_from(&[("APP_ENV", "production"), ("SESSION_SECRET", &secret), token]).unwrap();
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn session_identity_needs_the_auth_token() {
        let open = Config::default();
        assert!(open.accepts_auth_token(None));

        let gated = config_from(&[("AUTH_SERVICE_TOKEN", "auth-token")]).unwrap();
        assert!(gated.accepts_auth_token(Some("auth-token")));
        assert!(!gated.accepts_auth_token(Some("guess")));
        assert!(!gated.accepts_auth_token(None));

        let production = Config {
            environment: Environment::Production,
            ..Config::default()
        };
        assert!(!production.accepts_auth_token(None));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config_from(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { var: "PORT", .. })
        ));
        assert_eq!(
            config_from(&[("SESSION_SECRET", "short")]),
            Err(ConfigError::SessionSecretTooShort)
        );
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "5000"),
            ("FINISHED_RETENTION_HOURS", "2"),
        ])
        .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.finished_retention, Duration::from_secs(7200));
    }
}
