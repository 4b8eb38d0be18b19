//! Error types for the gateway.
//!
//! The request path only ever fails with one of three variants
//! (`Unauthorized`, `Backend`, `Internal`); the rest are start-up failures.
//! Converting a [`GatewayError`] into a response is the error passthrough:
//! backend errors are relayed verbatim, everything else is synthesized.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use hyper::ext::ReasonPhrase;
use thiserror::Error;

pub const UNAUTHORIZED_BODY: &str = "Missing or invalid Authorization header";

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("{}", UNAUTHORIZED_BODY)]
    Unauthorized,

    /// The backend answered with a non-success status. The body is kept raw
    /// and `status_text` is the reason phrase from the backend's status line.
    #[error("Backend returned {status} {status_text}")]
    Backend {
        status: u16,
        status_text: String,
        body: String,
    },

    /// Transport failure, undecodable payload, or any other failure while
    /// serving the request.
    #[error("{message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GatewayError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Status code the caller will see for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Backend { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        Self::internal(e.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        Self::internal(e.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Unauthorized => (
                status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                UNAUTHORIZED_BODY,
            )
                .into_response(),
            Self::Backend {
                status_text, body, ..
            } => {
                let mut resp =
                    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response();
                // hyper writes this instead of the canonical reason for the code.
                if !status_text.is_empty() && status.canonical_reason() != Some(status_text.as_str())
                {
                    if let Ok(reason) = ReasonPhrase::try_from(status_text) {
                        resp.extensions_mut().insert(reason);
                    }
                }
                resp
            }
            other => {
                let body = serde_json::json!({ "error": other.to_string() });
                (
                    status,
                    [(header::CONTENT_TYPE, "application/json")],
                    body.to_string(),
                )
                    .into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
