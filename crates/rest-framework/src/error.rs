//! # Framework Errors
//!
//! Every failure the REST layer can report, and how each one is answered.
//!
//! | Error | Status | Body |
//! |-------|--------|------|
//! | [`DispatchError`] | 405 | plain text |
//! | [`RestError::NotFound`] | 404 | plain text |
//! | [`RestError::Validation`] | 400 | [`ErrorEnvelope`] |
//! | [`RestError::Execution`] | 500 | [`ErrorEnvelope`] |

use crate::envelope::{ErrorEnvelope, JsonMode};
use crate::response::Resolution;
use http::StatusCode;
use tracing::error;

/// Boxed error type events fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The requested HTTP method cannot be dispatched to the resource.
///
/// Both variants answer with the same resource-level message; the event involved is
/// kept for logging only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// No event accepts the method (or the explicit event is not tagged with it).
    #[error("This resource does not support the HTTP method : {method}")]
    MethodNotSupported {
        resource: String,
        method: String,
        event: Option<String>,
    },
    /// The explicitly requested event is not declared at all.
    #[error("This resource does not support the HTTP method : {method}")]
    NoSuchEvent {
        resource: String,
        method: String,
        event: String,
    },
}

impl DispatchError {
    /// The uppercase method that was rejected.
    pub fn method(&self) -> &str {
        match self {
            DispatchError::MethodNotSupported { method, .. }
            | DispatchError::NoSuchEvent { method, .. } => method,
        }
    }
}

/// A failure escaping a pipeline stage without being handled.
#[derive(Debug, thiserror::Error)]
pub enum StageFailure {
    /// The event returned an error.
    #[error("{source}")]
    Handler {
        event: String,
        #[source]
        source: BoxError,
    },
    /// The event panicked.
    #[error("{message}")]
    Panicked { message: String },
}

/// Errors the REST interceptor turns into responses.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// Binding reported that something the request refers to does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Validation findings remained after custom validation.
    #[error("request failed validation")]
    Validation(ErrorEnvelope),
    /// The event failed in a way nothing else handled.
    #[error("Unexpected error occurred executing this API call: {cause}")]
    Execution { cause: String },
    #[error("failed to serialize error body: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::Dispatch(_) => StatusCode::METHOD_NOT_ALLOWED,
            RestError::NotFound(_) => StatusCode::NOT_FOUND,
            RestError::Validation(_) => StatusCode::BAD_REQUEST,
            RestError::Execution { .. } | RestError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converts the error into the resolution answered to the caller.
    pub fn into_resolution(self, mode: JsonMode) -> Resolution {
        let status = self.status();
        let rendered = match self {
            RestError::Dispatch(e) => Ok(Resolution::error(status, e.to_string())),
            RestError::NotFound(message) => Ok(Resolution::error(status, message)),
            RestError::Validation(envelope) => Resolution::envelope(status, &envelope, mode),
            RestError::Execution { cause } => {
                Resolution::envelope(status, &ErrorEnvelope::unexpected(&cause), mode)
            }
            RestError::Serialization(e) => Err(e),
        };
        rendered.unwrap_or_else(|e| {
            error!(error = %e, "Error body could not be serialized");
            Resolution::error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        })
    }
}

/// Errors seen by [`RestClient`](crate::RestClient) callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Request controller closed")]
    ControllerClosed,
    #[error("Request controller dropped response channel")]
    ControllerDropped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_errors_share_resource_level_message() {
        let unsupported = DispatchError::MethodNotSupported {
            resource: "ExampleResource".into(),
            method: "POST".into(),
            event: None,
        };
        let missing = DispatchError::NoSuchEvent {
            resource: "ExampleResource".into(),
            method: "POST".into(),
            event: "nope".into(),
        };
        assert_eq!(
            unsupported.to_string(),
            "This resource does not support the HTTP method : POST"
        );
        assert_eq!(unsupported.to_string(), missing.to_string());
    }

    #[test]
    fn stage_failure_displays_cause_only() {
        let failure = StageFailure::Handler {
            event: "post".into(),
            source: "boom".into(),
        };
        assert_eq!(failure.to_string(), "boom");
    }

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(RestError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            RestError::Validation(ErrorEnvelope::default()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestError::Execution { cause: "x".into() }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
