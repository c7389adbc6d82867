use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::middleware::auth::token;
use crate::state::AppState;

use super::AuthCtx;

/// Extractor for handlers behind the guard.
/// Assumes the guard already inserted AuthCtx into request extensions;
/// answers 401 when it is missing (route not guarded).
pub struct AuthCtxExtractor(pub AuthCtx);

impl FromRequestParts<AppState> for AuthCtxExtractor
where
    AppState: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .map(AuthCtxExtractor)
            .ok_or(AppError::Unauthorized)
    }
}

/// Subject of the request when it carries a valid token, `None` otherwise.
///
/// For pages that personalize but do not require a login. A missing secret
/// still rejects with 500.
pub struct MaybeSubject(pub Option<String>);

impl FromRequestParts<AppState> for MaybeSubject
where
    AppState: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already validated by a guard further out.
        if let Some(ctx) = parts.extensions.get::<AuthCtx>() {
            return Ok(MaybeSubject(Some(ctx.subject.clone())));
        }

        let subject = token::current_subject(&parts.headers, &state.auth)?;
        Ok(MaybeSubject(subject))
    }
}
