use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// A required request parameter was not supplied.
    MissingParameter(String),
    /// The supplied address is empty, too long, or could not be geocoded.
    InvalidAddress(String),
    /// A latitude/longitude pair falls outside the valid ranges.
    InvalidCoordinates(String),
    /// The divisions collaborator found nothing for the address.
    AddressNotFound(String),
    /// An upstream API exhausted its rate limit. Aborts an in-progress
    /// aggregation instead of degrading to a warning.
    RateLimitExceeded {
        /// Human-readable message.
        message: String,
        /// Upstream-provided detail, when available.
        details: Option<String>,
    },
    /// An upstream API failed (network error, timeout, auth failure, or an
    /// unexpected status/body).
    ExternalServiceError {
        /// Human-readable message.
        message: String,
        /// Upstream-provided detail, when available.
        details: Option<String>,
    },
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl AppError {
    /// Machine-readable code used in error response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingParameter(_) => "MISSING_PARAMETER",
            AppError::InvalidAddress(_) => "INVALID_ADDRESS",
            AppError::InvalidCoordinates(_) => "INVALID_COORDINATES",
            AppError::AddressNotFound(_) => "ADDRESS_NOT_FOUND",
            AppError::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            AppError::ExternalServiceError { .. } => "EXTERNAL_SERVICE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
            AppError::WithContext { source, .. } => source.code(),
        }
    }

    /// HTTP status the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingParameter(_)
            | AppError::InvalidAddress(_)
            | AppError::InvalidCoordinates(_) => StatusCode::BAD_REQUEST,
            AppError::AddressNotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimitExceeded { .. } | AppError::ExternalServiceError { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::WithContext { source, .. } => source.status_code(),
        }
    }

    /// Human-readable message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            AppError::MissingParameter(msg)
            | AppError::InvalidAddress(msg)
            | AppError::InvalidCoordinates(msg)
            | AppError::AddressNotFound(msg)
            | AppError::InternalError(msg) => msg.clone(),
            AppError::RateLimitExceeded { message, .. }
            | AppError::ExternalServiceError { message, .. } => message.clone(),
            AppError::WithContext { source, .. } => source.message(),
        }
    }

    /// Optional debugging detail for the response body.
    pub fn details(&self) -> Option<String> {
        match self {
            AppError::RateLimitExceeded { details, .. }
            | AppError::ExternalServiceError { details, .. } => details.clone(),
            AppError::WithContext { source, .. } => source.details(),
            _ => None,
        }
    }

    /// Whether this error must abort an in-progress aggregation instead of
    /// being recorded as a per-source warning.
    pub fn is_fatal(&self) -> bool {
        match self {
            AppError::RateLimitExceeded { .. } => true,
            AppError::WithContext { source, .. } => source.is_fatal(),
            _ => false,
        }
    }
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingParameter(msg) => write!(f, "Missing parameter: {}", msg),
            AppError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            AppError::InvalidCoordinates(msg) => write!(f, "Invalid coordinates: {}", msg),
            AppError::AddressNotFound(msg) => write!(f, "Address not found: {}", msg),
            AppError::RateLimitExceeded { message, .. } => {
                write!(f, "Rate limit exceeded: {}", message)
            }
            AppError::ExternalServiceError { message, .. } => {
                write!(f, "External service error: {}", message)
            }
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Every error body is a single object carrying a machine-readable code,
    /// a human-readable message, and optional details. Logs errors based on
    /// their severity.
    fn into_response(self) -> Response {
        match &self {
            AppError::RateLimitExceeded { message, .. } => {
                tracing::error!("Rate limit exceeded: {}", message);
            }
            AppError::ExternalServiceError { message, .. } => {
                tracing::error!("External service error: {}", message);
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
            }
            AppError::WithContext { source, context } => {
                // Log full context chain for debugging
                tracing::error!("Error with context: {} -> {}", context, source);
                // Delegate to underlying error's response
                return source.clone().into_response();
            }
            other => {
                tracing::warn!("Client error: {}", other);
            }
        }

        let mut error = json!({
            "code": self.code(),
            "message": self.message(),
        });
        if let Some(details) = self.details() {
            error["details"] = json!(details);
        }

        (self.status_code(), Json(json!({ "error": error }))).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an `AppError`.
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalServiceError {
            message: err.to_string(),
            details: None,
        }
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Arguments
    ///
    /// * `context` - The context message to add.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    ///
    /// # Arguments
    ///
    /// * `f` - A closure that produces the context message.
    #[allow(dead_code)]
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::MissingParameter("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidAddress("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidCoordinates("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::AddressNotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::RateLimitExceeded {
                message: "x".into(),
                details: None
            }
            .status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::ExternalServiceError {
                message: "x".into(),
                details: None
            }
            .status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::InternalError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_only_rate_limit_is_fatal() {
        assert!(AppError::RateLimitExceeded {
            message: "x".into(),
            details: None
        }
        .is_fatal());
        assert!(!AppError::ExternalServiceError {
            message: "x".into(),
            details: None
        }
        .is_fatal());
        assert!(!AppError::AddressNotFound("x".into()).is_fatal());
    }

    #[test]
    fn test_context_preserves_code_and_fatality() {
        let err: Result<(), AppError> = Err(AppError::RateLimitExceeded {
            message: "slow down".into(),
            details: None,
        });
        let wrapped = err.context("querying directory").unwrap_err();

        assert_eq!(wrapped.code(), "RATE_LIMIT_EXCEEDED");
        assert_eq!(wrapped.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(wrapped.is_fatal());
        assert!(wrapped.to_string().starts_with("querying directory"));
    }
}
