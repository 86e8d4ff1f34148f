//! Error taxonomy of the service and the single point where every error is
//! turned into the JSON envelope callers see.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validate::Violation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Unauthorized,
    Internal,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    /// Client input failed the field rules. `violations` is empty when the
    /// failure isn't tied to a single form field.
    #[error("{message}")]
    Validation {
        message: String,
        violations: Vec<Violation>,
    },

    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    /// The provider rejected the bearer token.
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Internal(String),

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            violations: Vec::new(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Validation { .. } | ApiError::Multipart(_) => ErrorKind::Validation,
            ApiError::Unauthorized(_) => ErrorKind::Unauthorized,
            ApiError::Internal(_) | ApiError::Transport(_) | ApiError::Json(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// HTTP status the error is reported with, always within 400..=599.
    pub fn code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the envelope. Internal errors never expose their own text.
    pub fn to_envelope(&self) -> ErrorEnvelope {
        let (title, message) = match self.kind() {
            ErrorKind::NotFound => ("Resource not found", self.to_string()),
            ErrorKind::Validation => ("Resource validation error", self.to_string()),
            ErrorKind::Unauthorized => ("Authorization error", self.to_string()),
            ErrorKind::Internal => ("Internal error", "Something went wrong".to_string()),
        };
        ErrorEnvelope {
            result_code: self.code().as_u16(),
            messages: vec![ErrorDetail {
                field: title.to_string(),
                message,
            }],
        }
    }
}

/// `{resultCode, messages: [{field, message}]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub result_code: u16,
    pub messages: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation { violations, .. } if !violations.is_empty() => {
                tracing::debug!(?violations, "rejected invalid send request");
            }
            _ if self.kind() == ErrorKind::Internal => {
                tracing::error!("internal error: {self}");
            }
            _ => tracing::debug!("request failed: {self}"),
        }
        (self.code(), Json(self.to_envelope())).into_response()
    }
}
