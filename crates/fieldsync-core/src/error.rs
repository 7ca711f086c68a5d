// ── Core error types ──
//
// User-facing errors from fieldsync-core. Consumers never match on reqwest
// or URL parser errors directly; the `From<fieldsync_api::Error>` impl
// translates transport failures into these variants. Store operations
// render them with `Display` into the snapshot's `error` field.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach monitoring service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Monitoring service timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Service errors ───────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },

    #[error("Request failed: {message}")]
    Request { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Worth retrying later (connection trouble, timeouts, 5xx).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout { .. } => true,
            Self::Service { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fieldsync_api::Error> for CoreError {
    fn from(err: fieldsync_api::Error) -> Self {
        match err {
            fieldsync_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout {
                        timeout_secs: fieldsync_api::REQUEST_TIMEOUT.as_secs(),
                    }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Request {
                        message: e.to_string(),
                    }
                }
            }
            fieldsync_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            fieldsync_api::Error::Http { status: 404, message } => CoreError::NotFound { message },
            fieldsync_api::Error::Http { status, message } => CoreError::Service { status, message },
            fieldsync_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            fieldsync_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("API URL cannot be used as a base: {url}"),
            },
            fieldsync_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
        }
    }
}
