use thiserror::Error;

/// Top-level error type for the `aihref-api` crate.
///
/// Covers every failure mode of a single backend request: building the
/// request, moving it over the wire, and turning the response into a typed
/// value. `aihref-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Request validation ──────────────────────────────────────────
    /// Site identifiers must be non-empty.
    #[error("Invalid site id: {reason}")]
    InvalidSiteId { reason: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-success response from the backend.
    #[error("HTTP {status} {status_text}")]
    Http {
        status: u16,
        status_text: String,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Build an `Http` error from a status code and the response body.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        Self::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            body,
        }
    }

    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_uses_canonical_reason() {
        let err = Error::from_status(reqwest::StatusCode::SERVICE_UNAVAILABLE, String::new());
        assert_eq!(err.to_string(), "HTTP 503 Service Unavailable");
        assert_eq!(err.status(), Some(503));
        assert!(err.is_transient());
    }

    #[test]
    fn not_found_is_not_transient() {
        let err = Error::from_status(reqwest::StatusCode::NOT_FOUND, "missing".into());
        assert!(err.is_not_found());
        assert!(!err.is_transient());
    }

    #[test]
    fn validation_errors_have_no_status() {
        let err = Error::InvalidSiteId {
            reason: "must not be empty".into(),
        };
        assert_eq!(err.status(), None);
    }
}
