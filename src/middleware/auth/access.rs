//! Route guard: validate the request's token, then put AuthCtx into extensions.
//!
//! The failure policy is fixed when the guard is composed onto a router:
//! - `OnFailure::Reject`: 401 JSON error (APIs)
//! - `OnFailure::Redirect`: 303 to a login page (browser pages)
//!
//! A missing secret is a 500 under either policy.

use std::{fmt, sync::Arc};

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::middleware::auth::token;
use crate::services::auth::{AuthConfig, AuthError, Rejection};

type RedirectFn = dyn Fn(&Request<Body>) -> String + Send + Sync;

#[derive(Clone)]
pub enum RedirectTarget {
    Static(String),
    // Computed from the failing request, only when a redirect is needed.
    Dynamic(Arc<RedirectFn>),
}

impl RedirectTarget {
    fn resolve(&self, req: &Request<Body>) -> String {
        match self {
            Self::Static(url) => url.clone(),
            Self::Dynamic(f) => f(req),
        }
    }
}

impl fmt::Debug for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(url) => f.debug_tuple("Static").field(url).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum OnFailure {
    Reject,
    Redirect(RedirectTarget),
}

#[derive(Clone, Debug)]
pub struct RequireAuth {
    auth: Arc<AuthConfig>,
    on_failure: OnFailure,
}

impl RequireAuth {
    /// Unauthenticated requests get a 401.
    pub fn reject(auth: Arc<AuthConfig>) -> Self {
        Self {
            auth,
            on_failure: OnFailure::Reject,
        }
    }

    /// Unauthenticated requests are redirected to `url`.
    pub fn redirect_to(auth: Arc<AuthConfig>, url: impl Into<String>) -> Self {
        Self {
            auth,
            on_failure: OnFailure::Redirect(RedirectTarget::Static(url.into())),
        }
    }

    /// Unauthenticated requests are redirected to `target(request)`.
    pub fn redirect_with<F>(auth: Arc<AuthConfig>, target: F) -> Self
    where
        F: Fn(&Request<Body>) -> String + Send + Sync + 'static,
    {
        Self {
            auth,
            on_failure: OnFailure::Redirect(RedirectTarget::Dynamic(Arc::new(target))),
        }
    }
}

/// Guard every route of `router` (route_layer: unmatched paths still 404).
///
/// Example:
/// ```ignore
/// let me = Router::new().route("/me", get(me));
/// let me = middleware::auth::access::apply(me, RequireAuth::reject(state.auth.clone()));
/// ```
pub fn apply<S>(router: Router<S>, guard: RequireAuth) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(guard, require_auth))
}

async fn require_auth(
    State(guard): State<RequireAuth>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = match token::validate_request(req.headers(), &guard.auth) {
        Ok(claims) => claims,
        Err(AuthError::Configuration(e)) => return Err(e.into()),
        Err(AuthError::AuthenticationRequired(reason)) => {
            log_rejection(&reason, &req);
            return match &guard.on_failure {
                OnFailure::Reject => Err(AppError::Unauthorized),
                OnFailure::Redirect(target) => {
                    Ok(Redirect::to(&target.resolve(&req)).into_response())
                }
            };
        }
    };

    // validate() guarantees a subject.
    let auth_ctx = AuthCtx::from_claims(claims).ok_or(AppError::Unauthorized)?;

    // middleware -> extractor
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

fn log_rejection(reason: &Rejection, req: &Request<Body>) {
    match reason {
        Rejection::MissingToken => {
            tracing::debug!(path = %req.uri().path(), "no access token");
        }
        _ => {
            tracing::warn!(error = %reason, path = %req.uri().path(), "access token verification failed");
        }
    }
}
