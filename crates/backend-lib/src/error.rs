// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("All fields are required")]
    AllFieldsRequired,

    #[error("Please provide both email and password")]
    MissingCredentials,

    #[error("Missing required field: {0}")]
    MissingFields(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Email is already registered")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidPassword,

    #[error("Old password is incorrect")]
    OldPasswordMismatch,

    #[error("No token provided")]
    NoToken,

    #[error("Authorization header must be `Bearer <token>`")]
    BadFormat,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Only user accounts can perform this action")]
    Unauthorized,

    #[error("Admin access required")]
    Forbidden,

    #[error("An active job for this position and company already exists")]
    DuplicateActive,

    #[error("Job not found")]
    JobNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::AllFieldsRequired
            | AppError::MissingCredentials
            | AppError::MissingFields(_)
            | AppError::InvalidInput(_)
            | AppError::OldPasswordMismatch => StatusCode::BAD_REQUEST,
            AppError::NoToken
            | AppError::BadFormat
            | AppError::InvalidToken
            | AppError::InvalidPassword => StatusCode::UNAUTHORIZED,
            AppError::Unauthorized | AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::JobNotFound => StatusCode::NOT_FOUND,
            AppError::EmailTaken | AppError::DuplicateActive => StatusCode::CONFLICT,
            AppError::Io(_) | AppError::Json(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::AllFieldsRequired => "VAL_001",
            AppError::MissingCredentials => "VAL_002",
            AppError::MissingFields(_) => "VAL_003",
            AppError::InvalidInput(_) => "VAL_004",
            AppError::OldPasswordMismatch => "VAL_005",
            AppError::NoToken => "AUTH_001",
            AppError::BadFormat => "AUTH_002",
            AppError::InvalidToken => "AUTH_003",
            AppError::InvalidPassword => "AUTH_004",
            AppError::Unauthorized => "AUTH_005",
            AppError::Forbidden => "AUTH_006",
            AppError::UserNotFound => "NF_001",
            AppError::JobNotFound => "NF_002",
            AppError::EmailTaken => "CONFLICT_001",
            AppError::DuplicateActive => "CONFLICT_002",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Whether the failure is on our side rather than the caller's
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Io(_) | AppError::Json(_) => {
                "Internal server error".to_string()
            },
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            // client errors never carry credential material, so they go out verbatim
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if self.is_server_error() {
            tracing::error!(code = error_code, error = %self, "request failed");
        }

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Unparsable bodies and wrong content types are the caller's input error
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        AppError::InvalidToken
    }
}
