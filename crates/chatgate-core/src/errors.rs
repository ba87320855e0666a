//! Pipeline error taxonomy and the uniform client-facing error body.
//!
//! Every stage of the pipeline fails with exactly one [`AppError`]. Returning
//! it from a middleware or handler short-circuits the remaining stages, and
//! axum renders it once through [`IntoResponse`]:
//!
//! ```json
//! { "success": false, "message": "...", "errorMessages": [{ "path": "...", "message": "..." }] }
//! ```
//!
//! | Kind | Status |
//! |------|--------|
//! | `Unauthorized` | 401 |
//! | `Forbidden` | 403 |
//! | `ValidationError` | 400 |
//! | `NotFound` | 404 |
//! | `InternalError` | 500 |

use std::fmt;

use anyhow::Error;
use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Message rendered for every internal error. Detail only goes to the log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong!";

const FALLBACK_BODY: &str =
    r#"{"success":false,"message":"Something went wrong!","errorMessages":[]}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    ValidationError,
    NotFound,
    InternalError,
}

impl ErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level (or route-level) entry of an error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub path: String,
    pub message: String,
}

impl ErrorMessage {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Wire shape of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error_messages: Vec<ErrorMessage>,
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub error_messages: Vec<ErrorMessage>,
    /// Private cause of an internal error. Logged, never rendered.
    pub source: Option<Error>,
}

impl AppError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            error_messages: Vec::new(),
            source: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Field violations found while validating a request.
    pub fn validation(error_messages: Vec<ErrorMessage>) -> Self {
        Self {
            error_messages,
            ..Self::new(ErrorKind::ValidationError, "Validation Error")
        }
    }

    /// No route matched `path` (the original request URL).
    pub fn not_found(path: impl Into<String>) -> Self {
        Self {
            error_messages: vec![ErrorMessage::new(path, "API Not Found")],
            ..Self::new(ErrorKind::NotFound, "Not found")
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            source: Some(err.into()),
            ..Self::new(ErrorKind::InternalError, INTERNAL_ERROR_MESSAGE)
        }
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::internal(anyhow::anyhow!(detail.into()))
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// The body this error renders to.
    ///
    /// Internal errors always carry the generic message and no entries,
    /// whatever the constructor was given.
    pub fn body(&self) -> ErrorResponse {
        match self.kind {
            ErrorKind::InternalError => ErrorResponse {
                success: false,
                message: INTERNAL_ERROR_MESSAGE.to_string(),
                error_messages: Vec::new(),
            },
            _ => ErrorResponse {
                success: false,
                message: self.message.clone(),
                error_messages: self.error_messages.clone(),
            },
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match (&self.kind, &self.source) {
            (ErrorKind::InternalError, Some(source)) => {
                tracing::error!(error = ?source, "internal error");
            }
            (ErrorKind::InternalError, None) => {
                tracing::error!(message = %self.message, "internal error");
            }
            (kind, _) => {
                tracing::debug!(kind = %kind, message = %self.message, "request rejected");
            }
        }

        let mut response = match serde_json::to_vec(&self.body()) {
            Ok(bytes) => json_response(self.status(), bytes),
            Err(err) => {
                tracing::error!(error = %err, "failed to render error body");
                fallback_response()
            }
        };

        response.extensions_mut().insert(self.kind);
        response
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

fn json_response(status: StatusCode, bytes: Vec<u8>) -> Response {
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        bytes,
    )
        .into_response()
}

/// Minimal 500 used when nothing better can be produced.
pub fn fallback_response() -> Response {
    let mut response = json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        FALLBACK_BODY.as_bytes().to_vec(),
    );
    response.extensions_mut().insert(ErrorKind::InternalError);
    response
}
