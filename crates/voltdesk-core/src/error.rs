// ── Core error types ──
//
// User-facing errors from voltdesk-core. Consumers never see HTTP
// status codes or JSON parse failures directly. The
// `From<voltdesk_api::Error>` impl classifies wire errors into the three
// failure families the console distinguishes: transport, logical
// (envelope said no), and authorization (HTTP 403).

use thiserror::Error;

/// Message shown when the backend answers 403, regardless of body.
pub const FORBIDDEN_MESSAGE: &str = "no permission to view this resource";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Auth errors ──────────────────────────────────────────────────
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("{}", FORBIDDEN_MESSAGE)]
    Forbidden { message: Option<String> },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    /// The backend answered with a well-formed envelope that reported
    /// failure, or reported success without data.
    #[error("Rejected by backend: {}", message.as_deref().unwrap_or("<no message>"))]
    Rejected {
        message: Option<String>,
        /// HTTP status the envelope arrived with, when there was one.
        status: Option<u16>,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Normalize into the text shown on a slice notification.
    ///
    /// Logical failures surface the backend's message when it sent one;
    /// 403 always maps to [`FORBIDDEN_MESSAGE`]; everything else uses
    /// `fallback`.
    pub fn notification_message(&self, fallback: &str) -> String {
        match self {
            Self::Forbidden { .. } => FORBIDDEN_MESSAGE.to_owned(),
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_owned(),
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }

    /// HTTP status behind the failure, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Rejected { status, .. } => *status,
            Self::Forbidden { .. } => Some(403),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<voltdesk_api::Error> for CoreError {
    fn from(err: voltdesk_api::Error) -> Self {
        use voltdesk_api::Error as ApiError;

        match err {
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(403) {
                    CoreError::Forbidden { message: None }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::Unauthorized { message } => CoreError::AuthenticationFailed {
                message: message.unwrap_or_else(|| "session expired or invalid token".into()),
            },
            ApiError::Forbidden { message } => CoreError::Forbidden { message },
            ApiError::Http { status, body: _ } => CoreError::Api {
                message: format!("HTTP {status}"),
                status: Some(status),
            },
            ApiError::Rejected { message, status } => CoreError::Rejected {
                message,
                status: Some(status),
            },
            ApiError::MissingData { message } => CoreError::Rejected {
                message,
                status: None,
            },
            ApiError::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("malformed response: {message}"),
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_uses_fixed_message() {
        let err = CoreError::from(voltdesk_api::Error::Forbidden {
            message: Some("role lacks power".into()),
        });
        assert_eq!(err.notification_message("Failed to load users"), FORBIDDEN_MESSAGE);
    }

    #[test]
    fn rejected_surfaces_backend_message() {
        let err = CoreError::from(voltdesk_api::Error::Rejected {
            message: Some("in use".into()),
            status: 200,
        });
        assert_eq!(err.notification_message("Failed to delete power"), "in use");
    }

    #[test]
    fn rejected_without_message_uses_fallback() {
        let err = CoreError::from(voltdesk_api::Error::MissingData { message: None });
        assert_eq!(
            err.notification_message("Failed to load devices"),
            "Failed to load devices"
        );
    }

    #[test]
    fn rejected_keeps_http_status() {
        let err = CoreError::from(voltdesk_api::Error::Rejected {
            message: Some("device 9 does not exist".into()),
            status: 404,
        });
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.notification_message("Failed to load device"), "device 9 does not exist");

        let missing = CoreError::from(voltdesk_api::Error::MissingData { message: None });
        assert_eq!(missing.status(), None);
    }

    #[test]
    fn http_failure_uses_fallback() {
        let err = CoreError::from(voltdesk_api::Error::Http {
            status: 500,
            body: "oops".into(),
        });
        assert_eq!(err.notification_message("Failed to load meters"), "Failed to load meters");
    }
}
