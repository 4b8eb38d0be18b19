//! Bearer credential extraction.

use crate::error::{GatewayError, Result};
use axum::http::{header, HeaderMap};

const BEARER_PREFIX: &str = "Bearer ";

/// The caller's backend credential. Forwarded to exactly one backend and
/// never logged; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Pull the credential out of `Authorization: Bearer <token>`. The prefix is
/// case-sensitive; the token is trimmed.
pub fn extract_bearer(headers: &HeaderMap) -> Result<Credential> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(GatewayError::Unauthorized)?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(GatewayError::Unauthorized)?;

    Ok(Credential::new(token.trim()))
}
