use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Every command returns `Result<T, AppError>`; `kind()` tells the caller
/// how the failure should be surfaced.
#[derive(Debug, Error)]
pub enum AppError {
    /// Non-2xx response from the job service, already normalized.
    #[error("{message} (Status: {status})")]
    Api { status: u16, message: String },

    #[error("Authentication token is required to {0}.")]
    AuthRequired(&'static str),

    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Model output did not match the expected schema: {0}")]
    Schema(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Token storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// How a failure is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing, expired or rejected token: clear the session, go to login.
    Authentication,
    /// Malformed input: shown next to the field, never sent.
    Validation,
    /// Backend or transport failure: transient notification.
    Network,
    /// AI adapter failure: "insights unavailable" panel only.
    Insights,
    Internal,
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            AppError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::AuthRequired(_) => ErrorKind::Authentication,
            AppError::Api { status, .. } if *status == 401 || *status == 403 => {
                ErrorKind::Authentication
            }
            AppError::Api { .. } | AppError::Network(_) => ErrorKind::Network,
            AppError::Validation { .. } => ErrorKind::Validation,
            AppError::Schema(_) | AppError::Llm(_) => ErrorKind::Insights,
            AppError::Storage(_) | AppError::Config(_) | AppError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Parse(e) => AppError::Schema(e.to_string()),
            LlmError::EmptyContent => AppError::Schema(LlmError::EmptyContent.to_string()),
            other => AppError::Llm(other.to_string()),
        }
    }
}
