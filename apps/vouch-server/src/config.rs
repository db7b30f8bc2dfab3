//! Server configuration module.
//!
//! Supports configuration via environment variables:
//!
//! ```bash
//! # Public base URL used in shareable invitation links
//! VOUCH_PUBLIC_BASE_URL=https://vouch.example.com
//!
//! # Provider: SMTP
//! VOUCH_EMAIL_PROVIDER=smtp
//! SMTP_HOST=smtp.gmail.com
//! SMTP_PORT=587
//! SMTP_USERNAME=user@example.com
//! SMTP_PASSWORD=app_password
//! SMTP_USE_TLS=true
//!
//! # Sender config
//! VOUCH_EMAIL_FROM=noreply@vouch.example.com
//! VOUCH_EMAIL_FROM_NAME="Vouch References"
//! ```
//!
//! With no `VOUCH_EMAIL_PROVIDER` set, outbound notifications degrade to
//! structured log lines.

use std::env;
use thiserror::Error;

const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL for shareable links handed to referees.
    pub public_base_url: String,
    pub email: Option<EmailConfig>,
}

/// Email configuration for notifications
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub provider: EmailProviderConfig,
    /// From email address
    pub from_address: String,
    /// Optional from name
    pub from_name: Option<String>,
}

/// Email provider configuration
#[derive(Debug, Clone)]
pub enum EmailProviderConfig {
    /// SMTP email provider
    Smtp {
        host: String,
        port: u16,
        username: Option<String>,
        password: Option<String>,
        use_tls: bool,
    },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid email provider: {0}. Expected 'smtp'")]
    InvalidProvider(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),

    #[error("Missing from address: VOUCH_EMAIL_FROM is required when email is configured")]
    MissingFromAddress,

    #[error("SMTP provider requires SMTP_HOST")]
    SmtpMissingHost,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let public_base_url = env::var("VOUCH_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string());

        let Some(provider_type) = env::var("VOUCH_EMAIL_PROVIDER").ok() else {
            return Ok(Self {
                public_base_url,
                email: None,
            });
        };

        let provider = match provider_type.to_lowercase().as_str() {
            "smtp" => {
                let host = env::var("SMTP_HOST").map_err(|_| ConfigError::SmtpMissingHost)?;
                let port = env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse::<u16>()
                    .map_err(|_| {
                        ConfigError::InvalidPort(
                            env::var("SMTP_PORT").unwrap_or_else(|_| "invalid".to_string()),
                        )
                    })?;
                let username = env::var("SMTP_USERNAME").ok();
                let password = env::var("SMTP_PASSWORD").ok();
                let use_tls = env::var("SMTP_USE_TLS")
                    .map(|v| v.to_lowercase() == "true" || v == "1")
                    .unwrap_or(true); // TLS by default

                EmailProviderConfig::Smtp {
                    host,
                    port,
                    username,
                    password,
                    use_tls,
                }
            }
            other => return Err(ConfigError::InvalidProvider(other.to_string())),
        };

        let from_address =
            env::var("VOUCH_EMAIL_FROM").map_err(|_| ConfigError::MissingFromAddress)?;
        let from_name = env::var("VOUCH_EMAIL_FROM_NAME").ok();

        Ok(Self {
            public_base_url,
            email: Some(EmailConfig {
                provider,
                from_address,
                from_name,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    // All env vars we touch in tests - cleared before each test
    const ENV_VARS: &[&str] = &[
        "VOUCH_PUBLIC_BASE_URL",
        "VOUCH_EMAIL_PROVIDER",
        "SMTP_HOST",
        "SMTP_PORT",
        "SMTP_USERNAME",
        "SMTP_PASSWORD",
        "SMTP_USE_TLS",
        "VOUCH_EMAIL_FROM",
        "VOUCH_EMAIL_FROM_NAME",
    ];

    // Helper to clean up env vars - holds mutex lock
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
    }

    impl<'a> EnvGuard<'a> {
        fn new() -> Self {
            let lock = ENV_MUTEX.lock().unwrap();
            for var in ENV_VARS {
                env::remove_var(var);
            }
            Self { _lock: lock }
        }

        fn set(&self, key: &str, value: &str) {
            env::set_var(key, value);
        }
    }

    impl<'a> Drop for EnvGuard<'a> {
        fn drop(&mut self) {
            for var in ENV_VARS {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_default_config_no_email() {
        let _guard = EnvGuard::new();

        let config = ServerConfig::from_env().unwrap();
        assert!(config.email.is_none());
        assert_eq!(config.public_base_url, DEFAULT_PUBLIC_BASE_URL);
    }

    #[test]
    fn test_public_base_url_override() {
        let guard = EnvGuard::new();
        guard.set("VOUCH_PUBLIC_BASE_URL", "https://vouch.example.com");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.public_base_url, "https://vouch.example.com");
    }

    #[test]
    fn test_smtp_provider_config() {
        let guard = EnvGuard::new();
        guard.set("VOUCH_EMAIL_PROVIDER", "smtp");
        guard.set("SMTP_HOST", "smtp.example.com");
        guard.set("SMTP_PORT", "465");
        guard.set("SMTP_USERNAME", "user@example.com");
        guard.set("SMTP_PASSWORD", "secret");
        guard.set("SMTP_USE_TLS", "true");
        guard.set("VOUCH_EMAIL_FROM", "noreply@example.com");
        guard.set("VOUCH_EMAIL_FROM_NAME", "Vouch References");

        let config = ServerConfig::from_env().unwrap();
        let email = config.email.unwrap();
        assert_eq!(email.from_address, "noreply@example.com");
        assert_eq!(email.from_name, Some("Vouch References".to_string()));

        let EmailProviderConfig::Smtp {
            host,
            port,
            username,
            password,
            use_tls,
        } = email.provider;
        assert_eq!(host, "smtp.example.com");
        assert_eq!(port, 465);
        assert_eq!(username, Some("user@example.com".to_string()));
        assert_eq!(password, Some("secret".to_string()));
        assert!(use_tls);
    }

    #[test]
    fn test_smtp_defaults() {
        let guard = EnvGuard::new();
        guard.set("VOUCH_EMAIL_PROVIDER", "smtp");
        guard.set("SMTP_HOST", "smtp.example.com");
        guard.set("VOUCH_EMAIL_FROM", "noreply@example.com");

        let config = ServerConfig::from_env().unwrap();
        let email = config.email.unwrap();

        let EmailProviderConfig::Smtp {
            port,
            username,
            password,
            use_tls,
            ..
        } = email.provider;
        assert_eq!(port, 587);
        assert!(username.is_none());
        assert!(password.is_none());
        assert!(use_tls);
    }

    #[test]
    fn test_smtp_missing_host() {
        let guard = EnvGuard::new();
        guard.set("VOUCH_EMAIL_PROVIDER", "smtp");
        guard.set("VOUCH_EMAIL_FROM", "noreply@example.com");

        let result = ServerConfig::from_env();
        assert!(matches!(result, Err(ConfigError::SmtpMissingHost)));
    }

    #[test]
    fn test_invalid_port() {
        let guard = EnvGuard::new();
        guard.set("VOUCH_EMAIL_PROVIDER", "smtp");
        guard.set("SMTP_HOST", "smtp.example.com");
        guard.set("SMTP_PORT", "not_a_number");
        guard.set("VOUCH_EMAIL_FROM", "noreply@example.com");

        let result = ServerConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn test_invalid_provider() {
        let guard = EnvGuard::new();
        guard.set("VOUCH_EMAIL_PROVIDER", "carrier-pigeon");
        guard.set("VOUCH_EMAIL_FROM", "noreply@example.com");

        let result = ServerConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidProvider(_))));
    }

    #[test]
    fn test_missing_from_address() {
        let guard = EnvGuard::new();
        guard.set("VOUCH_EMAIL_PROVIDER", "smtp");
        guard.set("SMTP_HOST", "smtp.example.com");

        let result = ServerConfig::from_env();
        assert!(matches!(result, Err(ConfigError::MissingFromAddress)));
    }
}
