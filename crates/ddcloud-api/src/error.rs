use thiserror::Error;

use crate::models::ResourceType;

/// Response code the API uses when the addressed resource does not exist.
pub(crate) const RESOURCE_NOT_FOUND: &str = "RESOURCE_NOT_FOUND";

/// Top-level error type for the `ddcloud-api` crate.
///
/// Covers transport failures, API envelopes carrying a failure response
/// code, and the two terminal outcomes of deployment polling (a failed
/// resource state, or running out of time). `ddcloud-core` passes these
/// through to callers without translation.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials rejected by the API (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// The API answered with a failure `responseCode`.
    #[error("CloudControl API error (HTTP {status}, {response_code}): {message}")]
    Api {
        status: u16,
        response_code: String,
        message: String,
        operation: Option<String>,
        request_id: Option<String>,
    },

    /// A successful response was missing a value the operation depends on.
    #[error("Unexpected response to {operation}: {message}")]
    UnexpectedResponse { operation: String, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Deployment ──────────────────────────────────────────────────
    /// The resource disappeared while waiting for it to deploy.
    #[error("{resource_type} '{id}' not found while waiting for deployment")]
    ResourceNotFound {
        resource_type: ResourceType,
        id: String,
    },

    /// The resource reached a failure state.
    #[error("{resource_type} '{id}' failed to deploy (state {state})")]
    DeployFailed {
        resource_type: ResourceType,
        id: String,
        state: String,
    },

    /// Polling ran out of time.
    #[error("Timed out after {timeout_secs}s waiting for {resource_type} '{id}' to {action}")]
    Timeout {
        resource_type: ResourceType,
        id: String,
        action: &'static str,
        timeout_secs: u64,
    },
}

impl Error {
    /// Returns `true` if the API reported the addressed resource as missing.
    ///
    /// Only a CloudControl envelope carrying `RESOURCE_NOT_FOUND` counts. A
    /// bare HTTP 404 (wrong path, proxy page) is a real failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { response_code, .. } if response_code == RESOURCE_NOT_FOUND)
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// Nothing in this crate retries; callers that do can use this.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { response_code, .. } => response_code == "RESOURCE_BUSY",
            _ => false,
        }
    }

    /// The API response code, if this error came from an API envelope.
    pub fn response_code(&self) -> Option<&str> {
        match self {
            Self::Api { response_code, .. } => Some(response_code),
            _ => None,
        }
    }
}
