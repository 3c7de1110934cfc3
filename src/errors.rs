use serde::Serialize;

/// Unified error type for the console core.
///
/// Three failure families matter to callers because they map onto distinct
/// UI affordances: load failures (full-screen retry), mutation failures
/// (transient notification, in-memory state untouched), and validation
/// failures (synchronous, field-scoped, never sent to the backend). The
/// first two surface as `ServiceError`; validation failures are reported
/// through [`crate::editor::validation::ValidationMap`] and never as `Err`.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Transport succeeded but the response envelope carried a non-success
    /// code. The message is the server-supplied one when present, a generic
    /// fallback otherwise.
    #[error("Backend rejected request (code {code}): {message}")]
    Backend { code: i64, message: String },

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Event error: {0}")]
    EventError(String),
}

impl ServiceError {
    /// Message suitable for a user-facing notification.
    pub fn notification_message(&self) -> String {
        match self {
            Self::Backend { message, .. } => message.clone(),
            Self::ExternalApiError(_) | Self::SerializationError(_) => {
                "Something went wrong".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// True for failures worth a user-initiated retry (transport-level
    /// trouble rather than a domain rejection).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::ExternalApiError(_) | Self::SerializationError(_))
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::ExternalApiError(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerializationError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<url::ParseError> for ServiceError {
    fn from(err: url::ParseError) -> Self {
        ServiceError::ConfigError(err.to_string())
    }
}
