//! Claims validation: signature, expiry, audience, subject.
//!
//! This module is intentionally "core-only": it works on an already located
//! token string and an explicit `AuthConfig`. Locating the token in a request
//! lives in `middleware::auth::token`.

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation};

use crate::services::auth::claims::Claims;
use crate::services::auth::config::{AuthConfig, MissingSecret};

/// Why a request was not authenticated.
///
/// Only for logs: every variant renders as the same 401 so callers cannot
/// tell an expired token from a forged one.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    #[error("no token in request")]
    MissingToken,
    #[error("token expired")]
    Expired,
    #[error("jwt verification failed: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("missing subject claim")]
    MissingSubject,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Configuration(#[from] MissingSecret),
    #[error("authentication required: {0}")]
    AuthenticationRequired(#[from] Rejection),
}

impl AuthError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

pub fn validate(token: Option<&str>, config: &AuthConfig) -> Result<Claims, AuthError> {
    validate_at(token, config, Utc::now())
}

/// Validate `token` as of `now`.
///
/// The secret is checked before anything else, so a deployment without one
/// fails the same way whether or not the client sent a token.
///
/// `jsonwebtoken::Validation` checks:
/// - signature and algorithm
/// - presence of `exp`
/// - `aud` (only when an audience is configured)
///
/// This function additionally checks:
/// - `exp` against `now` (minus leeway)
/// - the subject is present and not empty
pub fn validate_at(
    token: Option<&str>,
    config: &AuthConfig,
    now: DateTime<Utc>,
) -> Result<Claims, AuthError> {
    let secret = config.secret()?;
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or(Rejection::MissingToken)?;

    let mut validation = Validation::new(config.algorithm);
    // Expiry is compared below against the caller's clock.
    validation.validate_exp = false;
    match &config.audience {
        Some(aud) => {
            validation.set_audience(&[aud]);
            validation.required_spec_claims.insert("aud".to_string());
        }
        None => validation.validate_aud = false,
    }

    let claims = jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(Rejection::from)?
        .claims;

    let leeway = i64::try_from(config.leeway_seconds).unwrap_or(i64::MAX);
    if claims.exp < now.timestamp().saturating_sub(leeway) {
        return Err(Rejection::Expired.into());
    }
    if claims.subject().is_none() {
        return Err(Rejection::MissingSubject.into());
    }

    Ok(claims)
}

/// Best-effort subject lookup.
///
/// Authentication failures become `None`. A missing secret is still an error:
/// it must not look like "not logged in".
pub fn current_subject(
    token: Option<&str>,
    config: &AuthConfig,
) -> Result<Option<String>, MissingSecret> {
    match validate(token, config) {
        Ok(claims) => Ok(claims.subject().map(str::to_string)),
        Err(AuthError::Configuration(e)) => Err(e),
        Err(AuthError::AuthenticationRequired(reason)) => {
            tracing::debug!(%reason, "soft authentication failed");
            Ok(None)
        }
    }
}
