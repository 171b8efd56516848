//! Application-wide error type and its HTTP rendering.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::infrastructure::storage::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload returned by JSON endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors surfaced by the registry and analytics services.
///
/// A missing short code is not an error at the service level (lookups return
/// `Ok(None)`); [`AppError::NotFound`] is only produced by the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    InvalidUrl { message: String, details: Value },

    #[error("{message}")]
    DomainRestricted { message: String, details: Value },

    #[error("{message}")]
    CodeGenerationExhausted { message: String, details: Value },

    #[error("{message}")]
    InvalidGranularity { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Storage { message: String, details: Value },
}

impl AppError {
    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            details,
        }
    }

    pub fn domain_restricted(message: impl Into<String>, details: Value) -> Self {
        Self::DomainRestricted {
            message: message.into(),
            details,
        }
    }

    pub fn code_generation_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::CodeGenerationExhausted {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_granularity(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidGranularity {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }

    /// Machine-readable error code used in JSON payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::DomainRestricted { .. } => "domain_restricted",
            Self::CodeGenerationExhausted { .. } => "code_generation_exhausted",
            Self::InvalidGranularity { .. } => "invalid_granularity",
            Self::NotFound { .. } => "not_found",
            Self::Storage { .. } => "storage_failure",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUrl { .. }
            | Self::DomainRestricted { .. }
            | Self::InvalidGranularity { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            // Retryable: the caller may simply submit again.
            Self::CodeGenerationExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` when repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CodeGenerationExhausted { .. } | Self::Storage { .. }
        )
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            Self::InvalidUrl { message, details }
            | Self::DomainRestricted { message, details }
            | Self::CodeGenerationExhausted { message, details }
            | Self::InvalidGranularity { message, details }
            | Self::NotFound { message, details }
            | Self::Storage { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::storage("Storage failure", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = e.field_errors().keys().map(|k| k.to_string()).collect();
        AppError::invalid_url(e.to_string(), json!({ "fields": fields }))
    }
}
