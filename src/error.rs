use std::fmt;

use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

/// Classification for failures coming back from the scheduling backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorCode {
    NotFound,
    Forbidden,
    HttpTimeout,
    RateLimited,
    InvalidResponse,
    Unavailable,
    Unknown,
}

impl BackendErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendErrorCode::NotFound => "NOT_FOUND",
            BackendErrorCode::Forbidden => "FORBIDDEN",
            BackendErrorCode::HttpTimeout => "HTTP_TIMEOUT",
            BackendErrorCode::RateLimited => "RATE_LIMITED",
            BackendErrorCode::InvalidResponse => "INVALID_RESPONSE",
            BackendErrorCode::Unavailable => "BACKEND_UNAVAILABLE",
            BackendErrorCode::Unknown => "UNKNOWN_BACKEND_ERROR",
        }
    }
}

impl fmt::Display for BackendErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        details: Option<JsonValue>,
    },

    #[error("{message}")]
    Upstream {
        code: BackendErrorCode,
        message: String,
        correlation_id: Option<String>,
    },

    #[error("booking failed: {message}")]
    Booking {
        message: String,
        details: Option<JsonValue>,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, "validation error");
        AppError::Validation {
            message,
            details: None,
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: JsonValue) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, details = %details, "validation error with details");
        AppError::Validation {
            message,
            details: Some(details),
        }
    }

    pub fn upstream(code: BackendErrorCode, message: impl Into<String>) -> Self {
        Self::upstream_with_correlation(code, message, None)
    }

    pub fn upstream_with_correlation(
        code: BackendErrorCode,
        message: impl Into<String>,
        correlation_id: Option<&str>,
    ) -> Self {
        let message = message.into();
        match correlation_id {
            Some(id) => {
                warn!(target: "app::backend", code = %code, correlation_id = %id, %message);
            }
            None => {
                warn!(target: "app::backend", code = %code, %message);
            }
        }
        AppError::Upstream {
            code,
            message,
            correlation_id: correlation_id.map(|value| value.to_string()),
        }
    }

    pub fn booking(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::booking", %message, "booking error");
        AppError::Booking {
            message,
            details: None,
        }
    }

    pub fn booking_with_details(message: impl Into<String>, details: JsonValue) -> Self {
        let message = message.into();
        error!(target: "app::booking", %message, details = %details, "booking error with details");
        AppError::Booking {
            message,
            details: Some(details),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::other", %message, "other error");
        AppError::Other(message)
    }

    pub fn upstream_code(&self) -> Option<BackendErrorCode> {
        match self {
            AppError::Upstream { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn upstream_correlation_id(&self) -> Option<&str> {
        match self {
            AppError::Upstream { correlation_id, .. } => correlation_id.as_deref(),
            _ => None,
        }
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, AppError::Upstream { .. })
    }
}
