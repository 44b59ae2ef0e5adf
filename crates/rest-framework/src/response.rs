//! # Resolutions & Responses
//!
//! A [`Resolution`] is what an event, a stage action or an interceptor decides the
//! request should answer with. Rendering it produces the [`Response`] the transport
//! commits to the wire, exactly once per request.

use crate::envelope::{ErrorEnvelope, JsonMode};
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use tracing::error;

pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// The outcome a request resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A 200 response whose body is the serialized value.
    Json(Value),
    /// A 200 response whose body is JSON text the caller already produced.
    RawJson(String),
    /// A plain-text error response.
    Error { status: StatusCode, message: String },
    /// Any status, content type and body.
    Stream {
        status: StatusCode,
        content_type: String,
        body: Vec<u8>,
    },
}

impl Resolution {
    /// A 200 JSON resolution for any serializable value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Resolution::Json(serde_json::to_value(value)?))
    }

    pub fn raw_json(text: impl Into<String>) -> Self {
        Resolution::RawJson(text.into())
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Resolution::Error {
            status,
            message: message.into(),
        }
    }

    /// A JSON resolution carrying an [`ErrorEnvelope`] with the given status.
    pub fn envelope(
        status: StatusCode,
        envelope: &ErrorEnvelope,
        mode: JsonMode,
    ) -> Result<Self, serde_json::Error> {
        Ok(Resolution::Stream {
            status,
            content_type: APPLICATION_JSON.to_string(),
            body: envelope.to_json(mode)?.into_bytes(),
        })
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Resolution::Json(_) | Resolution::RawJson(_) => StatusCode::OK,
            Resolution::Error { status, .. } | Resolution::Stream { status, .. } => *status,
        }
    }

    /// Renders the resolution into the bytes that go on the wire.
    pub fn render(self, mode: JsonMode) -> Response {
        match self {
            Resolution::Json(value) => match mode.render(&value) {
                Ok(text) => Response::new(StatusCode::OK, APPLICATION_JSON, text.into_bytes()),
                Err(e) => {
                    error!(error = %e, "JSON body could not be serialized");
                    Response::text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                }
            },
            Resolution::RawJson(text) => {
                Response::new(StatusCode::OK, APPLICATION_JSON, text.into_bytes())
            }
            Resolution::Error { status, message } => Response::text(status, message),
            Resolution::Stream {
                status,
                content_type,
                body,
            } => Response::new(status, content_type, body),
        }
    }
}

/// A committed response: status, content type and body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: StatusCode, content_type: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body,
        }
    }

    pub fn text(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, TEXT_PLAIN, message.into().into_bytes())
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn is_json(&self) -> bool {
        self.content_type == APPLICATION_JSON
    }
}
