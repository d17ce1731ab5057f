use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use chrono::TimeDelta;
use peoplehub_core::AppError;
use peoplehub_domain::{LockoutPolicy, SessionPolicy};
use tracing_subscriber::EnvFilter;

/// Minimum accepted length of `AUTH_BOOTSTRAP_TOKEN`.
const MIN_BOOTSTRAP_TOKEN_LEN: usize = 16;

/// One-shot command selected by the first CLI argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Serve HTTP.
    Serve,
    /// Apply migrations and exit.
    MigrateOnly,
    /// Delete stale sessions and exit.
    PurgeSessions,
}

impl RunMode {
    fn parse(argument: Option<&str>) -> Result<Self, AppError> {
        match argument {
            None | Some("serve") => Ok(Self::Serve),
            Some("migrate") => Ok(Self::MigrateOnly),
            Some("purge-sessions") => Ok(Self::PurgeSessions),
            Some(other) => Err(AppError::Validation(format!(
                "unknown command '{other}', expected 'serve', 'migrate' or 'purge-sessions'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub run_mode: RunMode,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub api_host: String,
    pub api_port: u16,
    pub session_policy: SessionPolicy,
    pub lockout_policy: LockoutPolicy,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(env::args().nth(1).as_deref(), |name| env::var(name).ok())
    }

    fn from_lookup(
        command: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let run_mode = RunMode::parse(command)?;

        let database_url = required(&lookup, "DATABASE_URL")?;
        let bootstrap_token = required(&lookup, "AUTH_BOOTSTRAP_TOKEN")?;
        if bootstrap_token.len() < MIN_BOOTSTRAP_TOKEN_LEN {
            return Err(AppError::Validation(format!(
                "AUTH_BOOTSTRAP_TOKEN must be at least {MIN_BOOTSTRAP_TOKEN_LEN} characters"
            )));
        }

        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parsed(&lookup, "API_PORT", 3001_u16)?;
        let database_max_connections = parsed(&lookup, "DATABASE_MAX_CONNECTIONS", 10_u32)?;

        let session_policy = SessionPolicy::new(
            duration(&lookup, "SESSION_IDLE_MINUTES", 30, TimeDelta::try_minutes)?,
            duration(&lookup, "SESSION_ABSOLUTE_HOURS", 12, TimeDelta::try_hours)?,
        )?;
        let lockout_policy = LockoutPolicy::new(
            parsed(&lookup, "LOGIN_MAX_FAILED_ATTEMPTS", 5_i32)?,
            duration(&lookup, "LOGIN_LOCKOUT_MINUTES", 15, TimeDelta::try_minutes)?,
        )?;

        Ok(Self {
            run_mode,
            database_url,
            database_max_connections,
            frontend_url,
            bootstrap_token,
            api_host,
            api_port,
            session_policy,
            lockout_policy,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, AppError> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name).filter(|value| !value.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}"))),
        None => Ok(default),
    }
}

fn duration(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: i64,
    unit: fn(i64) -> Option<TimeDelta>,
) -> Result<TimeDelta, AppError> {
    let amount = parsed(lookup, name, default)?;
    unit(amount).ok_or_else(|| AppError::Validation(format!("{name} is out of range")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::TimeDelta;
    use peoplehub_core::AppError;

    use super::{ApiConfig, RunMode};

    fn load(command: Option<&str>, pairs: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(command, |name| values.get(name).cloned())
    }

    const BASE: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/peoplehub"),
        ("AUTH_BOOTSTRAP_TOKEN", "bootstrap-token-0123"),
    ];

    #[test]
    fn defaults_apply_when_optional_values_are_missing() {
        let config = load(None, BASE).unwrap_or_else(|_| unreachable!());

        assert_eq!(config.run_mode, RunMode::Serve);
        assert_eq!(config.api_port, 3001);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert_eq!(config.session_policy.idle_timeout(), TimeDelta::minutes(30));
        assert_eq!(config.session_policy.absolute_lifetime(), TimeDelta::hours(12));
        assert_eq!(config.lockout_policy.max_failed_attempts(), 5);
        assert_eq!(config.lockout_policy.lockout_duration(), TimeDelta::minutes(15));
        assert!(config.socket_address().is_ok());
    }

    #[test]
    fn overrides_are_parsed() {
        let mut pairs = BASE.to_vec();
        pairs.extend([
            ("API_PORT", "8080"),
            ("SESSION_IDLE_MINUTES", "10"),
            ("SESSION_ABSOLUTE_HOURS", "2"),
            ("LOGIN_MAX_FAILED_ATTEMPTS", "3"),
        ]);
        let config = load(Some("purge-sessions"), &pairs).unwrap_or_else(|_| unreachable!());

        assert_eq!(config.run_mode, RunMode::PurgeSessions);
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.session_policy.idle_timeout(), TimeDelta::minutes(10));
        assert_eq!(config.lockout_policy.max_failed_attempts(), 3);
    }

    #[test]
    fn missing_or_short_secrets_are_rejected() {
        assert!(matches!(
            load(None, &[("AUTH_BOOTSTRAP_TOKEN", "bootstrap-token-0123")]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            load(
                None,
                &[
                    ("DATABASE_URL", "postgres://localhost/peoplehub"),
                    ("AUTH_BOOTSTRAP_TOKEN", "short"),
                ]
            ),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut pairs = BASE.to_vec();
        pairs.push(("API_PORT", "not-a-port"));
        assert!(matches!(load(None, &pairs), Err(AppError::Validation(_))));

        let mut pairs = BASE.to_vec();
        pairs.extend([("SESSION_IDLE_MINUTES", "60"), ("SESSION_ABSOLUTE_HOURS", "0")]);
        assert!(matches!(load(None, &pairs), Err(AppError::Validation(_))));

        assert!(matches!(load(Some("explode"), BASE), Err(AppError::Validation(_))));
    }

    #[test]
    fn socket_address_rejects_hostnames() {
        let mut pairs = BASE.to_vec();
        pairs.push(("API_HOST", "localhost"));
        let config = load(None, &pairs).unwrap_or_else(|_| unreachable!());
        assert!(matches!(config.socket_address(), Err(AppError::Internal(_))));
    }
}
