// ── Core error types ──
//
// User-facing errors from aihref-core. Consumers never see raw reqwest
// errors or JSON parse failures directly. The `From<aihref_api::Error>`
// impl translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to analytics backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Analytics backend timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Site not found: {site_id}")]
    SiteNotFound { site_id: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Backend returned an unreadable response: {message}")]
    InvalidResponse { message: String },

    // ── Combination errors ───────────────────────────────────────────
    #[error("No sites configured")]
    NoSites,

    /// Every site failed, or the backend-combined request failed.
    #[error("Failed to fetch combined analytics: {reason}")]
    CombinedFetchFailed { reason: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Validation / configuration ───────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<aihref_api::Error> for CoreError {
    fn from(err: aihref_api::Error) -> Self {
        match err {
            aihref_api::Error::InvalidSiteId { reason } => {
                CoreError::ValidationFailed { message: reason }
            }
            aihref_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            aihref_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            aihref_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            aihref_api::Error::Http {
                status: 404,
                body: _,
                status_text: _,
            } => CoreError::NotFound {
                resource: "analytics resource".into(),
            },
            aihref_api::Error::Http {
                status,
                status_text,
                body: _,
            } => CoreError::Api {
                message: format!("HTTP {status} {status_text}"),
                status: Some(status),
            },
            aihref_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}

impl CoreError {
    /// HTTP status behind this error, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}
