//! JSON API response envelope and lenient request body reading.
//!
//! Handlers return `Result<ApiResponse<T>, AppError>`:
//! - success renders `{"status": "success", "data": ...}`
//! - failure renders through `AppError` (`{"status": "error", ...}`)

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;

#[derive(Debug, Serialize)]
struct SuccessBody<T> {
    status: &'static str,
    data: T,
}

#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    data: T,
    cookies: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
            cookies: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Attach a `Set-Cookie` value built by `token_cookie` / `clear_cookie`.
    pub fn with_cookie(mut self, cookie: String) -> Self {
        self.cookies.push(cookie);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = SuccessBody {
            status: "success",
            data: self.data,
        };
        let mut response = (self.status, Json(body)).into_response();

        for cookie in self.cookies {
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(e) => {
                    tracing::error!(error = %e, "refusing to send malformed cookie");
                    return AppError::Internal.into_response();
                }
            }
        }

        response
    }
}

/// `Set-Cookie` value carrying a token. Script access is always off.
pub fn token_cookie(name: &str, token: &str, max_age_seconds: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{name}={token}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        max_age_seconds.max(0)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that expires the named cookie.
pub fn clear_cookie(name: &str, secure: bool) -> String {
    token_cookie(name, "", 0, secure)
}

/// Request body decoded as JSON, or an empty object when it is missing or
/// not valid JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestData(pub Value);

impl RequestData {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self(Value::Object(Map::new()));
        }
        match serde_json::from_slice(bytes) {
            Ok(value) => Self(value),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unparsable request body");
                Self(Value::Object(Map::new()))
            }
        }
    }

    /// String field, trimmed; blank counts as absent.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn require_str(&self, key: &str) -> Result<&str, AppError> {
        self.str_field(key)
            .ok_or_else(|| AppError::required_parameter(key))
    }
}

impl<S> FromRequest<S> for RequestData
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::warn!(error = %e, "failed to read request body");
            AppError::bad_request("unreadable request body")
        })?;
        Ok(Self::from_bytes(&bytes))
    }
}
