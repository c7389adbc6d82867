/*
 * Responsibility
 * - Shared AppError for API handlers and middleware
 * - IntoResponse (HTTP status / JSON error body)
 * - Convert config / auth / issuance errors in one place
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::services::auth::{AuthError, IssueError, MissingSecret};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
    pub code: u16,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("missing required parameter: {0}")]
    RequiredParameter(String),
    #[error("User authentication is required to access this resource.")]
    Unauthorized,
    #[error("user is no longer subscribed to this service")]
    UserUnsubscribed,
    #[error("payment required")]
    PaymentRequired,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn required_parameter(name: impl Into<String>) -> Self {
        Self::RequiredParameter(name.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::RequiredParameter(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::UserUnsubscribed => StatusCode::UNAUTHORIZED,
            AppError::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            status: "error",
            message: self.to_string(),
            code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<MissingSecret> for AppError {
    fn from(e: MissingSecret) -> Self {
        tracing::error!(error = %e, "set JWT_AUTH_SECRET");
        AppError::Internal
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Configuration(e) => e.into(),
            // One message for every cause: do not reveal which check failed.
            AuthError::AuthenticationRequired(_) => AppError::Unauthorized,
        }
    }
}

impl From<IssueError> for AppError {
    fn from(e: IssueError) -> Self {
        match e {
            IssueError::MissingSubject => AppError::required_parameter("subject"),
            IssueError::Configuration(e) => e.into(),
            IssueError::UnsupportedAlgorithm(_) | IssueError::Encode(_) => AppError::Internal,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(_: ConfigError) -> Self {
        AppError::Internal
    }
}
