//! Session configuration parsing and validation.
//!
//! Centralises the environment-driven session settings so they are validated
//! consistently and can be tested in isolation. Release builds must spell out
//! every toggle; debug builds fall back to safe defaults with a warning.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use std::path::PathBuf;
use tracing::warn;
use zeroize::Zeroize;

use crate::config::BuildMode;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const TTL_ENV: &str = "SESSION_TTL_SECONDS";

const KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const KEY_MIN_LEN: usize = 64;
/// Idle expiry applied when `SESSION_TTL_SECONDS` is unset.
pub const DEFAULT_TTL_SECONDS: i64 = 2400;

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const TTL_EXPECTED: &str = "positive number of seconds";

/// Session settings derived from configuration toggles.
pub struct SessionSettings {
    /// Signing key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
    /// Idle expiry for the session state; the cookie itself ends with the
    /// browser session.
    pub ttl: Duration,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("key", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .field("same_site", &self.same_site)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
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
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie setting in release builds.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build session settings from environment variables and build mode.
///
/// # Errors
///
/// Returns [`SessionConfigError`] when a toggle is missing or invalid in
/// release mode, or when the key file cannot satisfy release requirements.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = bool_from_env(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site_from_env(env, mode, cookie_secure)?;
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let key = session_key_from_env(env, mode, allow_ephemeral)?;
    let ttl = ttl_from_env(env, mode)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl,
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
) -> Result<bool, SessionConfigError> {
    match env.string(name) {
        Some(value) => parse_bool(&value).map_or_else(
            || {
                if mode.is_debug() {
                    warn!(name, %value, "invalid boolean toggle; using default");
                    Ok(default)
                } else {
                    Err(SessionConfigError::InvalidEnv {
                        name,
                        value,
                        expected: BOOL_EXPECTED,
                    })
                }
            },
            Ok,
        ),
        None if mode.is_debug() => {
            warn!(name, default, "session toggle not set; using default");
            Ok(default)
        }
        None => Err(SessionConfigError::MissingEnv { name }),
    }
}

fn same_site_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };

    let Some(value) = env.string(SAMESITE_ENV) else {
        if mode.is_debug() {
            warn!("SESSION_SAMESITE not set; using default");
            return Ok(default_same_site);
        }
        return Err(SessionConfigError::MissingEnv { name: SAMESITE_ENV });
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("SESSION_SAMESITE=None without Secure; browsers may reject the cookie");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(%value, "invalid SESSION_SAMESITE; using default");
            Ok(default_same_site)
        }
        _ => Err(SessionConfigError::InvalidEnv {
            name: SAMESITE_ENV,
            value,
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SessionConfigError> {
    let allow = bool_from_env(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    Ok(allow)
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}

fn ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Duration, SessionConfigError> {
    let Some(value) = env.string(TTL_ENV) else {
        return Ok(Duration::seconds(DEFAULT_TTL_SECONDS));
    };
    match value.parse::<i64>() {
        Ok(seconds) if seconds > 0 => Ok(Duration::seconds(seconds)),
        _ if mode.is_debug() => {
            warn!(%value, "invalid SESSION_TTL_SECONDS; using default");
            Ok(Duration::seconds(DEFAULT_TTL_SECONDS))
        }
        _ => Err(SessionConfigError::InvalidEnv {
            name: TTL_ENV,
            value,
            expected: TTL_EXPECTED,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_with(vars: Vec<(&'static str, String)>) -> MockEnv {
        let table: HashMap<&'static str, String> = vars.into_iter().collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .returning(move |name| table.get(name).cloned());
        env
    }

    fn key_file(len: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp key file");
        file.write_all(&vec![b'k'; len]).expect("write key bytes");
        file
    }

    fn release_vars(key_path: &str) -> Vec<(&'static str, String)> {
        vec![
            (KEY_FILE_ENV, key_path.to_owned()),
            (COOKIE_SECURE_ENV, "1".to_owned()),
            (SAMESITE_ENV, "Strict".to_owned()),
            (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
        ]
    }

    #[test]
    fn release_accepts_fully_specified_settings() {
        let file = key_file(KEY_MIN_LEN);
        let path = file.path().to_str().expect("utf8 path").to_owned();
        let env = env_with(release_vars(&path));

        let settings =
            session_settings_from_env(&env, BuildMode::Release).expect("valid settings");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
        assert_eq!(settings.ttl, Duration::seconds(DEFAULT_TTL_SECONDS));
    }

    #[test]
    fn release_rejects_missing_cookie_secure() {
        let file = key_file(KEY_MIN_LEN);
        let path = file.path().to_str().expect("utf8 path").to_owned();
        let mut vars = release_vars(&path);
        vars.retain(|(name, _)| *name != COOKIE_SECURE_ENV);
        let env = env_with(vars);

        let err = session_settings_from_env(&env, BuildMode::Release).expect_err("missing toggle");
        assert!(matches!(
            err,
            SessionConfigError::MissingEnv {
                name: COOKIE_SECURE_ENV
            }
        ));
    }

    #[test]
    fn release_rejects_short_keys() {
        let file = key_file(KEY_MIN_LEN - 1);
        let path = file.path().to_str().expect("utf8 path").to_owned();
        let env = env_with(release_vars(&path));

        let err = session_settings_from_env(&env, BuildMode::Release).expect_err("short key");
        assert!(matches!(err, SessionConfigError::KeyTooShort { .. }));
    }

    #[test]
    fn release_rejects_insecure_samesite_none() {
        let file = key_file(KEY_MIN_LEN);
        let path = file.path().to_str().expect("utf8 path").to_owned();
        let mut vars = release_vars(&path);
        vars.retain(|(name, _)| *name != COOKIE_SECURE_ENV && *name != SAMESITE_ENV);
        vars.push((COOKIE_SECURE_ENV, "0".to_owned()));
        vars.push((SAMESITE_ENV, "None".to_owned()));
        let env = env_with(vars);

        let err = session_settings_from_env(&env, BuildMode::Release).expect_err("insecure none");
        assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
    }

    #[test]
    fn release_rejects_ephemeral_keys() {
        let file = key_file(KEY_MIN_LEN);
        let path = file.path().to_str().expect("utf8 path").to_owned();
        let mut vars = release_vars(&path);
        vars.retain(|(name, _)| *name != ALLOW_EPHEMERAL_ENV);
        vars.push((ALLOW_EPHEMERAL_ENV, "1".to_owned()));
        let env = env_with(vars);

        let err = session_settings_from_env(&env, BuildMode::Release).expect_err("ephemeral");
        assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
    }

    #[test]
    fn debug_defaults_everything_with_a_generated_key() {
        let env = env_with(vec![(
            KEY_FILE_ENV,
            "/nonexistent/session_key".to_owned(),
        )]);

        let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    #[case("600", Duration::seconds(600))]
    #[case("nonsense", Duration::seconds(DEFAULT_TTL_SECONDS))]
    #[case("-5", Duration::seconds(DEFAULT_TTL_SECONDS))]
    fn debug_ttl_parsing_is_forgiving(#[case] raw: &str, #[case] expected: Duration) {
        let env = env_with(vec![(TTL_ENV, raw.to_owned())]);
        let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug settings");
        assert_eq!(settings.ttl, expected);
    }

    #[test]
    fn release_rejects_invalid_ttl() {
        let file = key_file(KEY_MIN_LEN);
        let path = file.path().to_str().expect("utf8 path").to_owned();
        let mut vars = release_vars(&path);
        vars.push((TTL_ENV, "soon".to_owned()));
        let env = env_with(vars);

        let err = session_settings_from_env(&env, BuildMode::Release).expect_err("bad ttl");
        assert!(matches!(
            err,
            SessionConfigError::InvalidEnv { name: TTL_ENV, .. }
        ));
    }
}
