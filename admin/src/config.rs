//! Configuration Management for the admin client
//!
//! Settings come from `FOLIO_*` environment variables (the binary loads an
//! optional `.env` file first) and are validated before any client is built.
//!
//! | Variable | Default |
//! |---|---|
//! | `FOLIO_BASE_URL` | `http://localhost:8000` |
//! | `FOLIO_READ_TIMEOUT_MS` | `10000` |
//! | `FOLIO_WRITE_TIMEOUT_MS` | `15000` |
//! | `FOLIO_LOG_LEVEL` | `info` |
//! | `FOLIO_ADMIN_EMAIL` / `FOLIO_ADMIN_PASSWORD` | unset |
//!
//! # Example
//!
//! ```no_run
//! use folio_admin::config::AdminConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AdminConfig::from_env()?;
//! println!("Backend: {}", config.base_url);
//! # Ok(())
//! # }
//! ```

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Default backend base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default timeout for read (GET) operations
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Default timeout for writes and uploads
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Default log filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration error
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Base URL is not an absolute http(s) URL
    #[error("Invalid base URL {value:?}: {reason}")]
    InvalidBaseUrl {
        /// Offending value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// A timeout is not a positive integer of milliseconds
    #[error("Invalid {var}: {value:?} is not a positive number of milliseconds")]
    InvalidTimeout {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },

    /// Only one of email / password was provided
    #[error("FOLIO_ADMIN_EMAIL and FOLIO_ADMIN_PASSWORD must be set together")]
    IncompleteCredentials,
}

/// Admin login used by the CLI before running a command.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Admin email
    pub email: String,
    /// Admin password
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated admin client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    /// Backend base URL, without a trailing slash
    pub base_url: String,
    /// Timeout for GET operations
    pub read_timeout: Duration,
    /// Timeout for writes and uploads
    pub write_timeout: Duration,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Optional auto-login credentials
    pub credentials: Option<Credentials>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            credentials: None,
        }
    }
}

impl AdminConfig {
    /// Configuration for `base_url` with default timeouts
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: validate_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// Override both timeouts
    #[must_use]
    pub const fn with_timeouts(mut self, read: Duration, write: Duration) -> Self {
        self.read_timeout = read;
        self.write_timeout = write;
        self
    }

    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns error if any variable is present but invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns error if any variable is present but invalid
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("FOLIO_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let credentials = match (lookup("FOLIO_ADMIN_EMAIL"), lookup("FOLIO_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(Credentials { email, password }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteCredentials),
        };

        Ok(Self {
            base_url: validate_base_url(&base_url)?,
            read_timeout: timeout_var(&lookup, "FOLIO_READ_TIMEOUT_MS", DEFAULT_READ_TIMEOUT)?,
            write_timeout: timeout_var(&lookup, "FOLIO_WRITE_TIMEOUT_MS", DEFAULT_WRITE_TIMEOUT)?,
            log_level: lookup("FOLIO_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            credentials,
        })
    }
}

fn validate_base_url(value: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(value.trim().trim_end_matches('/').to_string())
}

fn timeout_var<F>(lookup: &F, var: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(default);
    };

    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidTimeout { var, value }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AdminConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, AdminConfig::default());
        assert_eq!(config.read_timeout, Duration::from_secs(10));
        assert_eq!(config.write_timeout, Duration::from_secs(15));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AdminConfig::from_lookup(lookup(&[
            ("FOLIO_BASE_URL", "https://api.example.com/"),
            ("FOLIO_READ_TIMEOUT_MS", "2500"),
            ("FOLIO_WRITE_TIMEOUT_MS", "4000"),
            ("FOLIO_LOG_LEVEL", "debug"),
            ("FOLIO_ADMIN_EMAIL", "admin@example.com"),
            ("FOLIO_ADMIN_PASSWORD", "hunter2"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.read_timeout, Duration::from_millis(2500));
        assert_eq!(config.write_timeout, Duration::from_millis(4000));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.credentials.unwrap().email, "admin@example.com");
    }

    #[test]
    fn relative_or_foreign_urls_are_rejected() {
        assert!(matches!(
            AdminConfig::new("/api"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            AdminConfig::new("ftp://files.example.com"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn zero_or_garbage_timeouts_are_rejected() {
        for value in ["0", "-5", "soon"] {
            let result = AdminConfig::from_lookup(lookup(&[("FOLIO_READ_TIMEOUT_MS", value)]));
            assert_eq!(
                result,
                Err(ConfigError::InvalidTimeout {
                    var: "FOLIO_READ_TIMEOUT_MS",
                    value: value.to_string(),
                })
            );
        }
    }

    #[test]
    fn half_credentials_are_rejected() {
        let result = AdminConfig::from_lookup(lookup(&[("FOLIO_ADMIN_EMAIL", "admin@example.com")]));
        assert_eq!(result, Err(ConfigError::IncompleteCredentials));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials {
            email: "a@b.c".to_string(),
            password: "secret".to_string(),
        };
        assert!(!format!("{credentials:?}").contains("secret"));
    }
}
