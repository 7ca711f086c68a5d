// Async HTTP client for the sensor monitoring service.
//
// Responses are JSON bodies wrapped in a `{ data: ... }` envelope. This
// module only deals with transport mechanics; typed endpoint methods live
// in `endpoints.rs` as inherent methods on `RemoteClient`.

use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Raw HTTP client for the monitoring service.
///
/// Every call is bounded by the transport timeout and logged at `debug`
/// with its method, URL, and outcome. Logging never changes the result:
/// failures are returned to the caller untouched.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl RemoteClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` (e.g. `https://host/api`).
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages headers and timeout).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: TransportConfig::default().timeout.as_secs(),
        })
    }

    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(raw.to_owned()));
        }
        Ok(url)
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL, percent-encoding each one so
    /// identifiers can never escape their segment.
    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    /// `GET {base}/{segments...}`, returning the parsed body.
    pub async fn get(&self, segments: &[&str]) -> Result<Value, Error> {
        let url = self.url(segments)?;
        self.execute(Method::GET, url).await
    }

    /// `POST {base}/{segments...}` with no body, returning the parsed body.
    pub async fn post(&self, segments: &[&str]) -> Result<Value, Error> {
        let url = self.url(segments)?;
        self.execute(Method::POST, url).await
    }

    async fn execute(&self, method: Method, url: Url) -> Result<Value, Error> {
        debug!("{method} {url}");

        let result = match self.http.request(method.clone(), url.clone()).send().await {
            Ok(resp) => self.handle_response(resp).await,
            Err(e) => Err(self.transport_error(e)),
        };

        match &result {
            Ok(_) => debug!(%method, %url, "request succeeded"),
            Err(e) => debug!(%method, %url, error = %e, "request failed"),
        }
        result
    }

    // ── Response handling ────────────────────────────────────────────

    /// Parse a success body as JSON. Bodies that are not JSON (e.g. a
    /// plain-text table) come back as `Value::String`; empty bodies as `Null`.
    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(status, resp).await);
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|err| err.message.or(err.error))
            .or_else(|| (!raw.trim().is_empty()).then(|| raw.trim().to_owned()))
            .unwrap_or_else(|| status.to_string());

        Error::Http {
            status: status.as_u16(),
            message,
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }
}
