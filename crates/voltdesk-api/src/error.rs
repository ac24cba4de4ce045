use thiserror::Error;

/// Top-level error type for the `voltdesk-api` crate.
///
/// Covers every wire-level failure mode: transport, HTTP status,
/// envelope-level rejection, and malformed bodies. `voltdesk-core`
/// normalizes these into notification messages.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP status ─────────────────────────────────────────────────
    /// The server rejected the bearer token (HTTP 401).
    #[error("Not authenticated")]
    Unauthorized { message: Option<String> },

    /// The authenticated user lacks permission for the resource (HTTP 403).
    #[error("Forbidden")]
    Forbidden { message: Option<String> },

    /// Non-2xx response whose body is not a parseable envelope.
    #[error("HTTP {status}")]
    Http { status: u16, body: String },

    // ── Envelope ────────────────────────────────────────────────────
    /// The envelope reported `success: false`.
    #[error("Request rejected by server: {}", message.as_deref().unwrap_or("<no message>"))]
    Rejected {
        message: Option<String>,
        status: u16,
    },

    /// The envelope reported success but carried no `data`.
    #[error("Response envelope is missing data")]
    MissingData { message: Option<String> },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` for an HTTP 403 rejection.
    pub fn is_forbidden(&self) -> bool {
        match self {
            Self::Forbidden { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::FORBIDDEN),
            _ => false,
        }
    }

    /// Returns `true` if re-authenticating might resolve the error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` for failures where no usable response was received.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::Tls(_)
                | Self::Http { .. }
                | Self::Unauthorized { .. }
                | Self::Forbidden { .. }
        )
    }

    /// The message the server attached to the envelope, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. }
            | Self::MissingData { message }
            | Self::Forbidden { message }
            | Self::Unauthorized { message } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status code, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Http { status, .. } | Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
