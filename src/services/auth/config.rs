/*
 * Responsibility
 * - Auth settings (secret / audience / algorithm / where the token lives)
 * - Passed explicitly into validator / issuer / middleware (no ambient globals)
 */
use std::fmt;

use axum::http::{HeaderName, header};
use jsonwebtoken::Algorithm;

pub const DEFAULT_COOKIE_KEY: &str = "jwt";
pub const DEFAULT_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Signing secret is not configured.
///
/// This is a deployment fault, not an authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("jwt secret is not configured")]
pub struct MissingSecret;

/// Where a request carries its token: a header first, then a cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenKey {
    pub header: HeaderName,
    pub cookie: String,
}

impl Default for TokenKey {
    fn default() -> Self {
        Self {
            header: header::AUTHORIZATION,
            cookie: DEFAULT_COOKIE_KEY.to_string(),
        }
    }
}

/// Auth settings shared by the validator, the issuer and the guard.
#[derive(Clone)]
pub struct AuthConfig {
    secret: Option<Vec<u8>>,
    pub audience: Option<String>,
    pub algorithm: Algorithm,
    pub token_key: TokenKey,
    // Clock skew tolerance applied to `exp`, seconds.
    pub leeway_seconds: u64,
    // Lifetime of tokens minted by `JwtIssuer`, seconds.
    pub ttl_seconds: i64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("audience", &self.audience)
            .field("algorithm", &self.algorithm)
            .field("token_key", &self.token_key)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            audience: None,
            algorithm: Algorithm::HS256,
            token_key: TokenKey::default(),
            leeway_seconds: 0,
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

impl AuthConfig {
    /// An empty secret counts as missing.
    pub fn new(secret: Option<impl Into<Vec<u8>>>) -> Self {
        Self {
            secret: secret.map(Into::into).filter(|s| !s.is_empty()),
            ..Self::default()
        }
    }

    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self::new(Some(secret))
    }

    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn token_key(mut self, token_key: TokenKey) -> Self {
        self.token_key = token_key;
        self
    }

    pub fn leeway_seconds(mut self, leeway_seconds: u64) -> Self {
        self.leeway_seconds = leeway_seconds;
        self
    }

    pub fn ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    pub fn secret(&self) -> Result<&[u8], MissingSecret> {
        self.secret.as_deref().ok_or(MissingSecret)
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }
}

/// Only symmetric (HMAC) algorithms make sense with a shared secret.
pub fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}
