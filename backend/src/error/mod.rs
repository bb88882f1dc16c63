use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

/// Failures of the session and gamification core.
///
/// These never carry transport concepts; [`AppError`] maps them onto HTTP.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Bad signature, expired, malformed or gate-rejected token. The caller
    /// must re-authenticate.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// The store could not confirm a revocation. The session stays usable
    /// until it expires naturally.
    #[error("revocation could not be confirmed: {0}")]
    RevocationFailed(#[source] sqlx::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),
}

impl From<jsonwebtoken::errors::Error> for CoreError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        CoreError::InvalidCredential(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    Conflict(String),
    BadRequest(String),
    ServiceUnavailable(String),
    InternalServerError(anyhow::Error),
    Validation(Vec<String>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code, details) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND".to_string(), None),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                msg,
                "UNAUTHORIZED".to_string(),
                None,
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, "CONFLICT".to_string(), None),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                msg,
                "BAD_REQUEST".to_string(),
                None,
            ),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                msg,
                "SERVICE_UNAVAILABLE".to_string(),
                None,
            ),
            AppError::InternalServerError(err) => {
                tracing::error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "INTERNAL_SERVER_ERROR".to_string(),
                    None,
                )
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                "VALIDATION_ERROR".to_string(),
                Some(serde_json::json!({ "errors": errors })),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            code,
            details,
        });

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidCredential(reason) => {
                tracing::debug!(reason = %reason, "credential rejected");
                AppError::Unauthorized("Invalid or expired token, please log in again".to_string())
            }
            CoreError::RevocationFailed(source) => {
                tracing::error!(error = %source, "revocation could not be confirmed");
                AppError::ServiceUnavailable("Logout could not be confirmed, retry later".to_string())
            }
            CoreError::InvalidArgument(msg) => AppError::BadRequest(msg),
            CoreError::NotFound(msg) => AppError::NotFound(msg),
            CoreError::StoreUnavailable(source) => AppError::InternalServerError(source.into()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalServerError(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::InternalServerError(err.into()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let code = e.code.as_ref();
                    format!("{}: {}", field, code)
                })
            })
            .collect();
        messages.sort();
        if messages.is_empty() {
            // Only nested (per-item) errors were reported.
            messages.push(errors.to_string());
        }
        AppError::Validation(messages)
    }
}
