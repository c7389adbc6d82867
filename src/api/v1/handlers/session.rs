/*
 * Responsibility
 * - POST /session: mint a token for a subject and set the token cookie
 * - DELETE /session: expire the token cookie
 * - Development only (registered by routes() outside production)
 */
use axum::{extract::State, http::StatusCode};
use serde_json::{Map, Value};

use crate::{
    api::v1::dto::session::SessionResponse,
    error::AppError,
    response::{ApiResponse, RequestData, clear_cookie, token_cookie},
    state::AppState,
};

pub async fn create_session(
    State(state): State<AppState>,
    data: RequestData,
) -> Result<ApiResponse<SessionResponse>, AppError> {
    let subject = data.require_str("subject")?;

    let mut claims = Map::new();
    claims.insert("sub".to_string(), Value::String(subject.to_string()));
    if let Some(handle) = data.str_field("handle") {
        claims.insert("handle".to_string(), Value::String(handle.to_string()));
    }

    let issuer = state.issuer()?;
    let issued = issuer.issue(claims)?;
    tracing::info!(subject = %subject, expires_at = %issued.expires_at, "session issued");

    let cookie = token_cookie(
        &state.auth.token_key.cookie,
        &issued.token,
        issuer.ttl_seconds(),
        state.secure_cookies,
    );

    Ok(ApiResponse::ok(SessionResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_at: issued.expires_at,
    })
    .with_status(StatusCode::CREATED)
    .with_cookie(cookie))
}

pub async fn delete_session(State(state): State<AppState>) -> ApiResponse<Value> {
    ApiResponse::ok(Value::Null)
        .with_cookie(clear_cookie(&state.auth.token_key.cookie, state.secure_cookies))
}
