//! Process-wide configuration, read from the environment once at startup.
//!
//! Settings become an explicit [`AppConfig`] passed into the components that
//! need them instead of ambient lookups scattered through the code. Release
//! builds validate strictly; debug builds fall back to development defaults
//! with a warning. Session cookie settings live in
//! [`crate::inbound::http::session_config`], which follows the same split.

use std::net::SocketAddr;

use mockable::Env;
use tracing::warn;

use crate::domain::volunteer::EmailAddress;

const BIND_ADDR_ENV: &str = "BIND_ADDR";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const SSL_REDIRECT_ENV: &str = "SSL_REDIRECT";
const MAIL_TRANSPORT_ENV: &str = "MAIL_TRANSPORT";
const MAIL_API_BASE_URL_ENV: &str = "MAIL_API_BASE_URL";
const MAIL_API_TOKEN_ENV: &str = "MAIL_API_TOKEN";
const MAIL_FROM_ENV: &str = "MAIL_FROM";
const RECIPIENTS_ENV: &str = "NOTIFY_VOLUNTEERS_TO";
const FAIL_SILENTLY_ENV: &str = "MAIL_FAIL_SILENTLY";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAIL_FROM: &str = "no-reply@patasdovale.org.br";

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing values.
    Debug,
    /// Release builds require explicit, valid configuration.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    pub(crate) fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while validating application configuration.
#[derive(thiserror::Error, Debug)]
pub enum AppConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Which transport the notification dispatcher uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailTransportKind {
    /// Log-only transport; nothing leaves the process.
    Console,
    /// JSON mail-provider HTTP API.
    Api {
        /// Provider endpoint base URL.
        base_url: String,
        /// Bearer token for the provider.
        token: String,
    },
}

/// Notification dispatcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    /// Selected transport.
    pub transport: MailTransportKind,
    /// Sender address.
    pub from: String,
    /// Staff recipient list; empty disables notifications.
    pub recipients: Vec<String>,
    /// Swallow transport failures instead of surfacing them.
    pub fail_silently: bool,
}

/// Process-wide configuration constructed once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address for the HTTP server.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string; absent only in database-less debug runs.
    pub database_url: Option<String>,
    /// Redirect plain-HTTP requests to HTTPS.
    pub ssl_redirect: bool,
    /// Notification dispatcher settings.
    pub mail: MailConfig,
}

/// Build the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`AppConfigError`] when a value is missing or invalid in release
/// mode. Debug mode substitutes defaults and logs a warning instead.
pub fn app_config_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<AppConfig, AppConfigError> {
    Ok(AppConfig {
        bind_addr: bind_addr_from_env(env, mode)?,
        database_url: database_url_from_env(env, mode)?,
        ssl_redirect: bool_from_env(env, mode, SSL_REDIRECT_ENV, !mode.is_debug())?,
        mail: mail_config_from_env(env, mode)?,
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn bool_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: bool,
) -> Result<bool, AppConfigError> {
    let Some(value) = env.string(name) else {
        return Ok(default);
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(name, %value, "invalid boolean; using default");
            Ok(default)
        }
        None => Err(AppConfigError::InvalidEnv {
            name,
            value,
            expected: "1|0|true|false|yes|no|y|n",
        }),
    }
}

fn bind_addr_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<SocketAddr, AppConfigError> {
    let value = env
        .string(BIND_ADDR_ENV)
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
    match value.parse() {
        Ok(addr) => Ok(addr),
        Err(_) if mode.is_debug() => {
            warn!(%value, "invalid BIND_ADDR; using default");
            DEFAULT_BIND_ADDR
                .parse()
                .map_err(|_| AppConfigError::InvalidEnv {
                    name: BIND_ADDR_ENV,
                    value,
                    expected: "host:port",
                })
        }
        Err(_) => Err(AppConfigError::InvalidEnv {
            name: BIND_ADDR_ENV,
            value,
            expected: "host:port",
        }),
    }
}

fn database_url_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Option<String>, AppConfigError> {
    match env.string(DATABASE_URL_ENV) {
        Some(url) => Ok(Some(url)),
        None if mode.is_debug() => {
            warn!("DATABASE_URL not set; falling back to the in-memory store (dev only)");
            Ok(None)
        }
        None => Err(AppConfigError::MissingEnv {
            name: DATABASE_URL_ENV,
        }),
    }
}

fn recipients_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Vec<String>, AppConfigError> {
    let Some(raw) = env.string(RECIPIENTS_ENV) else {
        return Ok(Vec::new());
    };

    let mut recipients = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if EmailAddress::parse(entry).is_err() {
            if mode.is_debug() {
                warn!(recipient = entry, "invalid staff recipient skipped");
                continue;
            }
            return Err(AppConfigError::InvalidEnv {
                name: RECIPIENTS_ENV,
                value: raw.clone(),
                expected: "comma-separated email addresses",
            });
        }
        recipients.push(entry.to_owned());
    }
    Ok(recipients)
}

fn mail_transport_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<MailTransportKind, AppConfigError> {
    let default_kind = if mode.is_debug() { "console" } else { "api" };
    let kind = env
        .string(MAIL_TRANSPORT_ENV)
        .unwrap_or_else(|| default_kind.to_owned());

    match kind.to_ascii_lowercase().as_str() {
        "console" => Ok(MailTransportKind::Console),
        "api" => {
            let base_url = env.string(MAIL_API_BASE_URL_ENV);
            let token = env.string(MAIL_API_TOKEN_ENV);
            match (base_url, token) {
                (Some(base_url), Some(token)) => Ok(MailTransportKind::Api { base_url, token }),
                _ if mode.is_debug() => {
                    warn!("mail API settings incomplete; using console transport");
                    Ok(MailTransportKind::Console)
                }
                (None, _) => Err(AppConfigError::MissingEnv {
                    name: MAIL_API_BASE_URL_ENV,
                }),
                (_, None) => Err(AppConfigError::MissingEnv {
                    name: MAIL_API_TOKEN_ENV,
                }),
            }
        }
        _ if mode.is_debug() => {
            warn!(%kind, "invalid MAIL_TRANSPORT; using console transport");
            Ok(MailTransportKind::Console)
        }
        _ => Err(AppConfigError::InvalidEnv {
            name: MAIL_TRANSPORT_ENV,
            value: kind,
            expected: "console|api",
        }),
    }
}

fn mail_config_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<MailConfig, AppConfigError> {
    let from = env
        .string(MAIL_FROM_ENV)
        .unwrap_or_else(|| DEFAULT_MAIL_FROM.to_owned());
    if EmailAddress::parse(&from).is_err() {
        return Err(AppConfigError::InvalidEnv {
            name: MAIL_FROM_ENV,
            value: from,
            expected: "an email address",
        });
    }

    Ok(MailConfig {
        transport: mail_transport_from_env(env, mode)?,
        from,
        recipients: recipients_from_env(env, mode)?,
        fail_silently: bool_from_env(env, mode, FAIL_SILENTLY_ENV, true)?,
    })
}
