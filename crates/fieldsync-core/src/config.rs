// ── Runtime sync configuration ──
//
// These types describe *where* the monitoring service lives and how often
// to poll it. They never touch disk; the CLI (via fieldsync-config)
// constructs a `SyncConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use fieldsync_api::{TlsMode, TransportConfig};
use url::Url;

use crate::poller::DEFAULT_POLLING_INTERVAL;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Additionally trust this PEM-encoded CA certificate.
    CustomCa(PathBuf),
}

/// Configuration for syncing against one monitoring service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Service base URL (e.g., `https://sensors.example.com/api`).
    pub api_url: Url,
    pub tls: TlsVerification,
    /// Period of the realtime/alerts polling loop.
    pub polling_interval: Duration,
}

impl SyncConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsVerification::default(),
            polling_interval: DEFAULT_POLLING_INTERVAL,
        }
    }

    /// Transport settings for the HTTP client. The request timeout is
    /// fixed and not part of this config.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            },
            ..TransportConfig::default()
        }
    }
}
