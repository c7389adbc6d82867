//! Host allowlist.
//!
//! When `ALLOWED_HOSTS` is not `*`, requests for any other `Host` get a 404.
//! The offending host is only echoed back in debug mode.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::config::{AllowedHosts, Config};
use crate::error::AppError;

#[derive(Clone)]
struct HostPolicy {
    hosts: Arc<AllowedHosts>,
    debug: bool,
}

pub fn apply(router: Router, config: &Config) -> Router {
    if config.allowed_hosts == AllowedHosts::Any {
        return router;
    }

    let policy = HostPolicy {
        hosts: Arc::new(config.allowed_hosts.clone()),
        debug: config.debug,
    };
    router.layer(middleware::from_fn_with_state(policy, check_host))
}

async fn check_host(
    State(policy): State<HostPolicy>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().authority().map(|a| a.as_str()))
        .unwrap_or_default();

    if !policy.hosts.allows(host) {
        tracing::warn!(host = %host, "request for host not in ALLOWED_HOSTS");
        let message = if policy.debug {
            format!("Invalid host: '{host}'")
        } else {
            "not found".to_string()
        };
        return Err(AppError::not_found(message));
    }

    Ok(next.run(req).await)
}
