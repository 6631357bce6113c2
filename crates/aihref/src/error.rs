//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use aihref_config::ConfigError;
use aihref_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the analytics backend at {url}")]
    #[diagnostic(
        code(aihref::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             URL: {url}\n\
             Try: aihref health --backend {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(aihref::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(aihref::not_found),
        help("Run: aihref {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Analytics ────────────────────────────────────────────────────
    #[error("Failed to fetch combined analytics")]
    #[diagnostic(
        code(aihref::combined_failed),
        help(
            "{reason}\n\
             Run: aihref health to check the backend."
        )
    )]
    CombinedFailed { reason: String },

    #[error("API error: {message}")]
    #[diagnostic(code(aihref::api_error))]
    ApiError {
        status: Option<u16>,
        message: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(aihref::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(aihref::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: aihref config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(aihref::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(aihref::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(aihref::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. }
            | Self::ProfileNotFound { .. }
            | Self::ApiError {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::Config(ConfigError::Validation { .. }) => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::SiteNotFound { site_id } => CliError::NotFound {
                resource_type: "site".into(),
                identifier: site_id,
                list_command: "sites".into(),
            },

            CoreError::NotFound { resource } => CliError::NotFound {
                resource_type: "resource".into(),
                identifier: resource,
                list_command: "health".into(),
            },

            CoreError::NoSites => CliError::Validation {
                field: "sites".into(),
                reason: "the active profile lists no sites".into(),
            },

            CoreError::CombinedFetchFailed { reason } => CliError::CombinedFailed { reason },

            CoreError::Api { message, status } => CliError::ApiError { status, message },

            CoreError::InvalidResponse { message } => CliError::ApiError {
                status: None,
                message: format!("unreadable response: {message}"),
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let timeout = CliError::from(CoreError::Timeout { timeout_secs: 5 });
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);

        let missing = CliError::from(CoreError::SiteNotFound {
            site_id: "nope".into(),
        });
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(missing.to_string(), "site 'nope' not found");

        let conn = CliError::from(CoreError::ConnectionFailed {
            url: "http://localhost:8080".into(),
            reason: "refused".into(),
        });
        assert_eq!(conn.exit_code(), exit_code::CONNECTION);

        let combined = CliError::from(CoreError::CombinedFetchFailed {
            reason: "all 4 site requests failed".into(),
        });
        assert_eq!(combined.exit_code(), exit_code::GENERAL);
        assert_eq!(combined.to_string(), "Failed to fetch combined analytics");
    }

    #[test]
    fn api_error_keeps_backend_message() {
        let err = CliError::from(CoreError::Api {
            message: "HTTP 500 Internal Server Error".into(),
            status: Some(500),
        });
        assert!(matches!(err, CliError::ApiError { status: Some(500), .. }));
        assert_eq!(err.to_string(), "API error: HTTP 500 Internal Server Error");
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
