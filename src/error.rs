//! Error types.
//!
//! [`RealtimeError`] is the client-side error type. It never escapes
//! [`crate::connector::RealtimeConnector::connect`]: handshake failures are
//! converted into a fallback, and errors on an established channel are handed
//! to the caller's error callback.
//!
//! [`RelayError`] is the relay server's error type; each variant maps to an
//! HTTP status code and a structured JSON error response.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Errors raised by the transports.
///
/// # Categories
///
/// | Variant          | Raised by           | Typical cause                         |
/// |------------------|---------------------|---------------------------------------|
/// | `WebSocket`      | WebSocket driver    | handshake refused, socket reset       |
/// | `Http`           | SSE / polling       | DNS, connect or body read failure     |
/// | `HttpStatus`     | SSE / polling       | non-2xx response                      |
/// | `Decode`         | dispatcher / poller | payload is not the expected JSON      |
/// | `InvalidUrl`     | polling             | endpoint cannot be parsed             |
/// | `ConnectTimeout` | connector           | handshake did not finish in time      |
/// | `Closed`         | WebSocket / SSE     | server ended the stream               |
#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    /// WebSocket protocol or I/O failure.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// HTTP request or body stream failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("unexpected status {status} from {url}")]
    HttpStatus {
        /// HTTP status code returned by the server.
        status: u16,
        /// URL that was requested.
        url: String,
    },

    /// A payload could not be decoded as JSON.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// An endpoint URL could not be parsed.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The transport did not open within the connect timeout.
    #[error("connect timed out after {} ms", .0.as_millis())]
    ConnectTimeout(Duration),

    /// The remote end closed the stream.
    #[error("stream closed by remote")]
    Closed,
}

impl RealtimeError {
    /// Returns a short, stable label for the variant, used as a log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::WebSocket(_) => "websocket",
            Self::Http(_) => "http",
            Self::HttpStatus { .. } => "http_status",
            Self::Decode(_) => "decode",
            Self::InvalidUrl { .. } => "invalid_url",
            Self::ConnectTimeout(_) => "connect_timeout",
            Self::Closed => "closed",
        }
    }
}

/// Structured JSON error response body.
///
/// All relay error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: event payload must be a JSON object"
///   }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Relay server errors with HTTP status code mapping.
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000-1999 | Validation | 400 Bad Request           |
/// | 3000-3999 | Server     | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
