//! Cross-origin access for browser clients.
//!
//! - `CORS_ENABLED=false`: no layer at all.
//! - Development: any origin.
//! - Production: exact matches from `CORS_ALLOWED_ORIGINS`; empty list, no origin.
//!
//! Credentials are never allowed; tokens travel in the configured header.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(600);

pub fn apply(router: Router, config: &Config) -> Router {
    match layer(config) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn layer(config: &Config) -> Option<CorsLayer> {
    if !config.cors_enabled {
        return None;
    }

    let origin = if config.app_env.is_production() {
        allowlist(&config.cors_allowed_origins)
    } else {
        AllowOrigin::from(Any)
    };

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(allowed_headers(&config.auth.token_key.header))
        .expose_headers([header::ACCESS_CONTROL_ALLOW_ORIGIN])
        .max_age(PREFLIGHT_MAX_AGE);
    Some(cors)
}

fn allowlist(origins: &[String]) -> AllowOrigin {
    // AllowOrigin::list rejects a wildcard entry.
    if origins.iter().any(|o| o == "*") {
        return AllowOrigin::from(Any);
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring unusable CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(origins)
}

// The token header is whatever JWT_HEADER_KEY names, so it joins the defaults.
fn allowed_headers(token_header: &HeaderName) -> Vec<HeaderName> {
    let mut headers = vec![
        header::ORIGIN,
        HeaderName::from_static("x-requested-with"),
        header::CONTENT_TYPE,
        header::ACCEPT,
        header::AUTHORIZATION,
        HeaderName::from_static("x-request-id"),
    ];
    if !headers.contains(token_header) {
        headers.push(token_header.clone());
    }
    headers
}
