use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Map, Value};
use tracing::error;
use uuid::Uuid;

use crate::services::auth::claims::subject_of;
use crate::services::auth::config::{AuthConfig, DEFAULT_TTL_SECONDS, MissingSecret, is_hmac};

#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error(transparent)]
    Configuration(#[from] MissingSecret),
    #[error("unsupported signing algorithm: {0:?}")]
    UnsupportedAlgorithm(Algorithm),
    #[error("claims must carry a non-empty 'sub' (or 'user_id')")]
    MissingSubject,
    #[error("failed to sign jwt: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// Knobs for a single `issue` call.
///
/// `None` timestamps are resolved against the clock when `issue` runs:
/// `iat = now`, `exp = iat + 7 days`.
#[derive(Debug, Clone, Copy)]
pub struct IssueOptions {
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub algorithm: Algorithm,
}

impl Default for IssueOptions {
    fn default() -> Self {
        Self {
            issued_at: None,
            expires_at: None,
            algorithm: Algorithm::HS256,
        }
    }
}

/// Sign `claims` with `secret`, merging in `exp` and `iat`.
pub fn issue(
    secret: &[u8],
    claims: Map<String, Value>,
    options: IssueOptions,
) -> Result<String, IssueError> {
    if secret.is_empty() {
        return Err(MissingSecret.into());
    }
    let issued_at = options.issued_at.unwrap_or_else(Utc::now);
    let expires_at = options
        .expires_at
        .unwrap_or(issued_at + TimeDelta::seconds(DEFAULT_TTL_SECONDS));

    sign(
        &EncodingKey::from_secret(secret),
        options.algorithm,
        claims,
        issued_at,
        expires_at,
    )
}

fn sign(
    key: &EncodingKey,
    algorithm: Algorithm,
    mut claims: Map<String, Value>,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Result<String, IssueError> {
    if !is_hmac(algorithm) {
        return Err(IssueError::UnsupportedAlgorithm(algorithm));
    }
    if subject_of(&claims).is_none() {
        return Err(IssueError::MissingSubject);
    }

    claims.insert("iat".to_string(), issued_at.timestamp().into());
    claims.insert("exp".to_string(), expires_at.timestamp().into());

    let mut header = Header::new(algorithm);
    header.typ = Some("JWT".to_string());
    Ok(jsonwebtoken::encode(&header, &claims, key)?)
}

/// A freshly minted token with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Config-bound issuer: algorithm, lifetime and audience come from `AuthConfig`.
#[derive(Clone)]
pub struct JwtIssuer {
    encoding_key: EncodingKey,
    algorithm: Algorithm,
    audience: Option<String>,
    ttl: TimeDelta,
}

impl std::fmt::Debug for JwtIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtIssuer")
            .field("algorithm", &self.algorithm)
            .field("audience", &self.audience)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtIssuer {
    pub fn from_config(config: &AuthConfig) -> Result<Self, IssueError> {
        let secret = config.secret()?;
        if !is_hmac(config.algorithm) {
            return Err(IssueError::UnsupportedAlgorithm(config.algorithm));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            algorithm: config.algorithm,
            audience: config.audience.clone(),
            ttl: TimeDelta::seconds(config.ttl_seconds),
        })
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    pub fn issue(&self, claims: Map<String, Value>) -> Result<IssuedToken, IssueError> {
        self.issue_at(claims, Utc::now())
    }

    /// Issue with `now` as the issued-at instant.
    ///
    /// Adds `aud` (when configured and absent) and a random `jti` (when absent).
    pub fn issue_at(
        &self,
        mut claims: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, IssueError> {
        if let Some(aud) = &self.audience {
            claims
                .entry("aud")
                .or_insert_with(|| Value::String(aud.clone()));
        }
        claims
            .entry("jti")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));

        let expires_at = now + self.ttl;
        let token = sign(&self.encoding_key, self.algorithm, claims, now, expires_at)
            .inspect_err(|e| error!(error = %e, "failed to issue jwt"))?;

        Ok(IssuedToken { token, expires_at })
    }
}
