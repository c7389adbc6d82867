/*
 * Responsibility
 * - Read settings from the environment (port, env, hosts, CORS, auth)
 * - Validate them (startup fails on invalid values)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderName;
use jsonwebtoken::Algorithm;

use crate::services::auth::config::{AuthConfig, DEFAULT_COOKIE_KEY, DEFAULT_TTL_SECONDS, TokenKey, is_hmac};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which `Host` values the app answers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedHosts {
    Any,
    List(Vec<String>),
}

impl AllowedHosts {
    fn parse(value: Option<&str>) -> Self {
        let hosts = split_list(value);
        if hosts.is_empty() || hosts.iter().any(|h| h == "*") {
            return Self::Any;
        }
        Self::List(hosts.into_iter().map(|h| h.to_ascii_lowercase()).collect())
    }

    /// `host` may carry a port; both `example.com:8080` and `example.com`
    /// entries match it.
    pub fn allows(&self, host: &str) -> bool {
        match self {
            Self::Any => true,
            Self::List(hosts) => {
                let host = host.to_ascii_lowercase();
                let bare = host
                    .rsplit_once(':')
                    .filter(|(_, port)| port.chars().all(|c| c.is_ascii_digit()))
                    .map_or(host.as_str(), |(name, _)| name);
                hosts.iter().any(|h| *h == host || *h == bare)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub debug: bool,

    pub allowed_hosts: AllowedHosts,
    pub cors_enabled: bool,
    pub cors_allowed_origins: Vec<String>,

    pub request_timeout_seconds: u64,
    pub body_limit_bytes: usize,

    pub auth: AuthConfig,
    // Where guarded pages send unauthenticated browsers.
    pub login_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match var("PORT") {
            Some(s) => s.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV").as_deref());
        let debug = parse_flag(var("DEBUG").as_deref(), false, "DEBUG")?;

        let allowed_hosts = AllowedHosts::parse(var("ALLOWED_HOSTS").as_deref());
        let cors_enabled = parse_flag(var("CORS_ENABLED").as_deref(), true, "CORS_ENABLED")?;
        let cors_allowed_origins = split_list(var("CORS_ALLOWED_ORIGINS").as_deref());

        let request_timeout_seconds =
            parse_number(var("REQUEST_TIMEOUT_SECONDS"), 30, "REQUEST_TIMEOUT_SECONDS")?;
        if request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }
        let body_limit_bytes = parse_number(var("BODY_LIMIT_BYTES"), 1024 * 1024, "BODY_LIMIT_BYTES")?;

        let algorithm = match var("JWT_ALGORITHM") {
            Some(s) => Algorithm::from_str(s.trim())
                .ok()
                .filter(|alg| is_hmac(*alg))
                .ok_or(ConfigError::Invalid("JWT_ALGORITHM"))?,
            None => Algorithm::HS256,
        };

        let header = match var("JWT_HEADER_KEY") {
            Some(s) => HeaderName::from_str(s.trim())
                .map_err(|_| ConfigError::Invalid("JWT_HEADER_KEY"))?,
            None => TokenKey::default().header,
        };
        let cookie = var("JWT_COOKIE_KEY")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_COOKIE_KEY.to_string());
        if cookie.is_empty() || !cookie.chars().all(is_cookie_name_char) {
            return Err(ConfigError::Invalid("JWT_COOKIE_KEY"));
        }

        let ttl_seconds = parse_number(var("JWT_TTL_SECONDS"), DEFAULT_TTL_SECONDS, "JWT_TTL_SECONDS")?;
        if ttl_seconds <= 0 {
            return Err(ConfigError::Invalid("JWT_TTL_SECONDS"));
        }
        let leeway_seconds = parse_number(var("JWT_LEEWAY_SECONDS"), 0, "JWT_LEEWAY_SECONDS")?;

        // Production refuses to start without a secret. In development guarded
        // routes answer 500 until it is set.
        let secret = var("JWT_AUTH_SECRET").filter(|s| !s.is_empty());
        if secret.is_none() && app_env.is_production() {
            return Err(ConfigError::Missing("JWT_AUTH_SECRET"));
        }
        let auth = AuthConfig::new(secret)
            .algorithm(algorithm)
            .token_key(TokenKey { header, cookie })
            .ttl_seconds(ttl_seconds)
            .leeway_seconds(leeway_seconds);
        let auth = match var("JWT_AUDIENCE").filter(|s| !s.trim().is_empty()) {
            Some(aud) => auth.audience(aud.trim()),
            None => auth,
        };

        let login_url = var("LOGIN_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "/login".to_string());

        Ok(Self {
            addr,
            app_env,
            debug,
            allowed_hosts,
            cors_enabled,
            cors_allowed_origins,
            request_timeout_seconds,
            body_limit_bytes,
            auth,
            login_url,
        })
    }
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(value: Option<&str>, default: bool, key: &'static str) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid(key)),
    }
}

fn parse_number<T: FromStr>(value: Option<String>, default: T, key: &'static str) -> Result<T, ConfigError> {
    match value {
        Some(s) => s.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

// RFC 6265 token characters.
fn is_cookie_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::http::header;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(!config.debug);
        assert_eq!(config.allowed_hosts, AllowedHosts::Any);
        assert!(config.cors_enabled);
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.body_limit_bytes, 1024 * 1024);
        assert!(!config.auth.has_secret());
        assert_eq!(config.auth.token_key.header, header::AUTHORIZATION);
        assert_eq!(config.auth.token_key.cookie, "jwt");
        assert_eq!(config.auth.ttl_seconds, 604_800);
        assert_eq!(config.auth.leeway_seconds, 0);
        assert_eq!(config.login_url, "/login");
    }

    #[test]
    fn auth_settings_are_read() {
        let config = load(&[
            ("JWT_AUTH_SECRET", "s3cret"),
            ("JWT_AUDIENCE", "api"),
            ("JWT_ALGORITHM", "HS512"),
            ("JWT_COOKIE_KEY", "session"),
            ("JWT_HEADER_KEY", "X-Auth-Token"),
            ("JWT_LEEWAY_SECONDS", "30"),
            ("JWT_TTL_SECONDS", "3600"),
        ])
        .unwrap();

        assert_eq!(config.auth.secret().unwrap(), b"s3cret");
        assert_eq!(config.auth.audience.as_deref(), Some("api"));
        assert_eq!(config.auth.algorithm, Algorithm::HS512);
        assert_eq!(config.auth.token_key.cookie, "session");
        assert_eq!(config.auth.token_key.header.as_str(), "x-auth-token");
        assert_eq!(config.auth.leeway_seconds, 30);
        assert_eq!(config.auth.ttl_seconds, 3600);
    }

    #[test]
    fn asymmetric_algorithm_is_invalid() {
        let err = load(&[("JWT_ALGORITHM", "RS256")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("JWT_ALGORITHM")));
    }

    #[test]
    fn bad_values_are_invalid() {
        assert!(matches!(load(&[("PORT", "http")]), Err(ConfigError::Invalid("PORT"))));
        assert!(matches!(load(&[("DEBUG", "maybe")]), Err(ConfigError::Invalid("DEBUG"))));
        assert!(matches!(
            load(&[("JWT_COOKIE_KEY", "a b")]),
            Err(ConfigError::Invalid("JWT_COOKIE_KEY"))
        ));
        assert!(matches!(
            load(&[("JWT_TTL_SECONDS", "0")]),
            Err(ConfigError::Invalid("JWT_TTL_SECONDS"))
        ));
        assert!(matches!(
            load(&[("REQUEST_TIMEOUT_SECONDS", "0")]),
            Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))
        ));
    }

    #[test]
    fn production_env_aliases() {
        let prod = load(&[("APP_ENV", "PROD"), ("JWT_AUTH_SECRET", "s3cret")]).unwrap();
        assert!(prod.app_env.is_production());
        assert!(!load(&[("APP_ENV", "staging")]).unwrap().app_env.is_production());
    }

    #[test]
    fn production_requires_a_secret() {
        let err = load(&[("APP_ENV", "production")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_AUTH_SECRET")));
    }

    #[test]
    fn allowed_hosts_match_with_and_without_port() {
        let hosts = AllowedHosts::parse(Some("example.com, api.example.com:8443"));
        assert!(hosts.allows("example.com"));
        assert!(hosts.allows("EXAMPLE.com:8080"));
        assert!(hosts.allows("api.example.com:8443"));
        assert!(!hosts.allows("api.example.com"));
        assert!(!hosts.allows("evil.test"));

        assert_eq!(AllowedHosts::parse(Some("*")), AllowedHosts::Any);
        assert!(AllowedHosts::Any.allows("anything"));
    }
}
