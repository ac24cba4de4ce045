//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use voltdesk_config::ConfigError;
use voltdesk_core::{CoreError, FORBIDDEN_MESSAGE};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to backend at {url}")]
    #[diagnostic(
        code(voltdesk::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(voltdesk::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(voltdesk::auth_failed),
        help("Log in again with: voltdesk login --profile {profile}")
    )]
    AuthFailed { message: String, profile: String },

    #[error("Not logged in to profile '{profile}'")]
    #[diagnostic(
        code(voltdesk::not_logged_in),
        help("Run: voltdesk login --profile {profile}")
    )]
    NotLoggedIn { profile: String },

    #[error("{message}")]
    #[diagnostic(
        code(voltdesk::forbidden),
        help("Ask an administrator to grant your role the matching permission.")
    )]
    PermissionDenied { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(voltdesk::not_found),
        help("Run: voltdesk {list_command} to see available records")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    /// A store operation ended in a `*Failed` transition.
    #[error("{message}")]
    #[diagnostic(code(voltdesk::operation_failed))]
    OperationFailed { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(voltdesk::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(voltdesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(voltdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: voltdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(voltdesk::no_config),
        help(
            "Create a profile with: voltdesk config init\n\
             Or pass --server. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(voltdesk::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(voltdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Interrupted")]
    #[diagnostic(code(voltdesk::interrupted))]
    Interrupted,

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(voltdesk::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotLoggedIn { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Classify the message carried by a `*Failed` transition.
    pub fn from_notification(message: String) -> Self {
        if message == FORBIDDEN_MESSAGE {
            Self::PermissionDenied { message }
        } else {
            Self::OperationFailed { message }
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::NotAuthenticated => Self::NotLoggedIn {
                profile: "current".into(),
            },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed {
                message,
                profile: "current".into(),
            },
            CoreError::Forbidden { .. } => Self::PermissionDenied {
                message: FORBIDDEN_MESSAGE.into(),
            },
            CoreError::NotFound { entity, identifier } => Self::NotFound {
                list_command: format!("{entity}s list"),
                resource_type: entity,
                identifier,
            },
            CoreError::Rejected { message, .. } => Self::OperationFailed {
                message: message.unwrap_or_else(|| "rejected by backend".into()),
            },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Api { message, .. } | CoreError::Internal(message) => {
                Self::ApiError { message }
            }
        }
    }
}
