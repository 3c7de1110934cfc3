use serde::Deserialize;

use crate::errors::ServiceError;

/// The backend's success code, used on every verb (including deletes).
pub const SUCCESS_CODE: i64 = 201;

/// The `{code, message, data}` response envelope every backend endpoint
/// wraps its payload in. `code == 201` signals success regardless of the
/// HTTP verb or status; anything else is a domain failure even when the
/// transport succeeded.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Success: the payload, which may legitimately be absent.
    pub fn into_data(self) -> Result<Option<T>, ServiceError> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(self.into_failure())
        }
    }

    /// Success with a mandatory payload.
    pub fn require_data(self, context: &str) -> Result<T, ServiceError> {
        let context = context.to_string();
        self.into_data()?.ok_or_else(|| {
            ServiceError::ExternalApiError(format!("{} response carried no data", context))
        })
    }

    /// Acknowledge a mutation: success yields the server message (for
    /// notifications), failure the usual domain error.
    pub fn accept(self) -> Result<Option<String>, ServiceError> {
        if self.is_success() {
            Ok(self.message)
        } else {
            Err(self.into_failure())
        }
    }

    fn into_failure(self) -> ServiceError {
        ServiceError::Backend {
            code: self.code,
            message: self
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Request failed".to_string()),
        }
    }
}
