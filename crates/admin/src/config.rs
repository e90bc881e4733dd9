//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_BASE_URL` - Public URL for the admin panel
//! - `ADMIN_SESSION_SECRET` - Session signing secret (min 32 chars)
//! - `ADMIN_OPERATOR_EMAIL` - The single email address allowed into the panel
//! - `ADMIN_OPERATOR_KEY` - Access key the operator signs in with (min 16 chars)
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};

use harmattan_core::Email;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_OPERATOR_KEY_LENGTH: usize = 16;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Operator identity and access key
    pub operator: OperatorConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// The single operator allowed into the panel.
///
/// Implements `Debug` manually to redact the access key.
#[derive(Clone)]
pub struct OperatorConfig {
    /// The only email address the access gate lets through.
    pub email: Email,
    /// Access key presented at login.
    pub access_key: SecretString,
}

impl std::fmt::Debug for OperatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorConfig")
            .field("email", &self.email)
            .field("access_key", &"[REDACTED]")
            .finish()
    }
}

impl OperatorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let email_raw = get_required_env("ADMIN_OPERATOR_EMAIL")?;
        let email = Email::parse(&email_raw).map_err(|e| {
            ConfigError::InvalidEnvVar("ADMIN_OPERATOR_EMAIL".to_owned(), e.to_string())
        })?;

        let access_key = get_validated_secret("ADMIN_OPERATOR_KEY")?;
        validate_secret_length(&access_key, "ADMIN_OPERATOR_KEY", MIN_OPERATOR_KEY_LENGTH)?;

        Ok(Self { email, access_key })
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid,
    /// or if secrets fail validation (placeholder detection, length).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ADMIN_DATABASE_URL")?;
        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_owned(), e.to_string()))?;
        let base_url = get_required_env("ADMIN_BASE_URL")?;

        let session_secret = get_validated_secret("ADMIN_SESSION_SECRET")?;
        validate_secret_length(
            &session_secret,
            "ADMIN_SESSION_SECRET",
            MIN_SESSION_SECRET_LENGTH,
        )?;

        let operator = OperatorConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            operator,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the configured operator identity.
    #[must_use]
    pub const fn operator(&self) -> &OperatorConfig {
        &self.operator
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Validate that a secret meets a minimum length requirement.
fn validate_secret_length(
    secret: &SecretString,
    var_name: &str,
    min_length: usize,
) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < min_length {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!(
                "must be at least {min_length} characters (got {})",
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Validate that a secret is not an obvious placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_owned(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_secrets_are_rejected() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));

        assert!(validate_secret_strength("changeme123", "TEST_VAR").is_err());
    }

    #[test]
    fn random_looking_secrets_pass() {
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR").is_ok());
    }

    #[test]
    fn short_session_secret_is_rejected() {
        let short = SecretString::from("short");
        let result = validate_secret_length(&short, "TEST_SESSION", MIN_SESSION_SECRET_LENGTH);
        assert!(result.is_err());

        let ok = SecretString::from("a".repeat(MIN_SESSION_SECRET_LENGTH));
        assert!(validate_secret_length(&ok, "TEST_SESSION", MIN_SESSION_SECRET_LENGTH).is_ok());
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let config = AdminConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_owned(),
            session_secret: SecretString::from("x".repeat(32)),
            operator: OperatorConfig {
                email: Email::parse("operator@harmattan.store").unwrap(),
                access_key: SecretString::from("k9v2m4x8q1w5e7r3"),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3001);
    }

    #[test]
    fn operator_debug_redacts_access_key() {
        let operator = OperatorConfig {
            email: Email::parse("operator@harmattan.store").unwrap(),
            access_key: SecretString::from("k9v2m4x8q1w5e7r3"),
        };

        let debug_output = format!("{operator:?}");
        assert!(debug_output.contains("operator@harmattan.store"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("k9v2m4x8q1w5e7r3"));
    }
}
