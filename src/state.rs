/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Cheap to clone (Arc inside)
 */
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{AuthConfig, JwtIssuer};

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthConfig>,
    // None until a signing secret is configured.
    issuer: Option<Arc<JwtIssuer>>,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(auth: AuthConfig, secure_cookies: bool) -> Self {
        let issuer = match JwtIssuer::from_config(&auth) {
            Ok(issuer) => Some(Arc::new(issuer)),
            Err(e) => {
                tracing::warn!(error = %e, "token issuance disabled");
                None
            }
        };

        Self {
            auth: Arc::new(auth),
            issuer,
            secure_cookies,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.auth.clone(), config.app_env.is_production())
    }

    pub fn issuer(&self) -> Result<&JwtIssuer, AppError> {
        match &self.issuer {
            Some(issuer) => Ok(issuer),
            None => {
                tracing::error!("token issuance requested but JWT_AUTH_SECRET is not set");
                Err(AppError::Internal)
            }
        }
    }
}
