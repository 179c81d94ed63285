//! Resilient HTTP access to the timetable host
//!
//! This module provides the connection manager used by every other component:
//! - Identity (browser fingerprint) ownership and rotation
//! - Bounded retry with linear backoff on timeouts and refused connections
//! - Liveness probing with identity rotation on 401/403
//! - Charset-aware body decoding (UTF-8 / windows-1251)

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1251};
use reqwest::Client;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;

use super::headers::Identity;
use crate::config::Config;
use crate::utils::error::FetchError;
use crate::utils::retry::{with_retry_if, RetryConfig, RetryError};

/// Raw answer from the transport, before status checks and decoding
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub elapsed: Duration,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure of a single transport attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Timeouts and refused connections are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Connect(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Other(e.to_string())
        }
    }
}

/// Something that can perform one GET under a given identity
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, identity: &Identity) -> Result<RawResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, url: &str, identity: &Identity) -> Result<RawResponse, TransportError> {
        (**self).get(url, identity).await
    }
}

/// reqwest-backed transport
///
/// Keeps one client (and so one cookie session) per identity generation; a
/// rotated identity starts a fresh session.
pub struct HttpTransport {
    timeout: Duration,
    session: Mutex<Option<(u64, Client)>>,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            session: Mutex::new(None),
        }
    }

    fn build_client(&self, identity: &Identity) -> Result<Client, TransportError> {
        Client::builder()
            .timeout(self.timeout)
            .default_headers(identity.headers().clone())
            .cookie_store(true)
            .gzip(true)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build client: {e}")))
    }

    /// Session client for `identity`
    ///
    /// Only the newest generation seen is cached. A request still carrying an
    /// older identity gets a one-off client and leaves the cache alone.
    fn client_for(&self, identity: &Identity) -> Result<Client, TransportError> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| TransportError::Other("session lock poisoned".to_string()))?;

        if let Some((generation, client)) = session.as_ref() {
            if *generation == identity.generation() {
                return Ok(client.clone());
            }
            if *generation > identity.generation() {
                return self.build_client(identity);
            }
        }

        let client = self.build_client(identity)?;
        *session = Some((identity.generation(), client.clone()));
        Ok(client)
    }

    #[cfg(test)]
    fn cached_generation(&self) -> Option<u64> {
        self.session
            .lock()
            .ok()
            .and_then(|session| session.as_ref().map(|(generation, _)| *generation))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, identity: &Identity) -> Result<RawResponse, TransportError> {
        let client = self.client_for(identity)?;
        let started = Instant::now();

        let response = client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            status,
            content_type,
            body,
            elapsed: started.elapsed(),
        })
    }
}

/// Result of a single ping of the host
#[derive(Debug, Clone, Serialize)]
pub struct PingReport {
    /// Human description of the status code
    pub status: String,
    pub code: u16,
    /// Elapsed seconds, millisecond precision
    pub time: f64,
}

/// Describe an HTTP status code the way the ping report shows it
pub fn status_description(code: u16) -> &'static str {
    match code {
        200 => "OK",
        204 => "No content (OK)",
        400 => "Bad request",
        401 => "Unauthorized (request error)",
        403 => "Forbidden",
        404 => "Not found",
        408 => "Request timeout",
        409 => "Request conflict",
        418 => "I'm a teapot",
        429 => "Too many requests",
        500 => "Internal server error",
        502 => "Bad gateway",
        503 => "Service unavailable",
        504 => "Gateway timeout",
        _ => "Unknown status",
    }
}

/// Owner of the shared identity and the only path to the network
///
/// Identity rotation is visible to every caller sharing this manager.
pub struct ConnectionManager<T: Transport = HttpTransport> {
    transport: T,
    identity: RwLock<Arc<Identity>>,
    retry: RetryConfig,
    max_rotations: u32,
}

impl ConnectionManager<HttpTransport> {
    /// Create a manager backed by reqwest using the network section of `config`
    pub fn new(config: &Config) -> Self {
        Self::with_transport(
            HttpTransport::new(config.request_timeout()),
            config.retry(),
            config.network.max_rotations,
        )
    }
}

impl<T: Transport> ConnectionManager<T> {
    /// Create a manager over any transport
    pub fn with_transport(transport: T, retry: RetryConfig, max_rotations: u32) -> Self {
        Self {
            transport,
            identity: RwLock::new(Arc::new(Identity::random(0))),
            retry,
            max_rotations,
        }
    }

    /// Snapshot of the current identity
    pub async fn identity(&self) -> Arc<Identity> {
        Arc::clone(&*self.identity.read().await)
    }

    /// Number of rotations performed so far
    pub async fn rotations(&self) -> u64 {
        self.identity.read().await.generation()
    }

    /// Replace the identity wholesale
    pub async fn rotate_identity(&self) {
        let mut identity = self.identity.write().await;
        let next = Identity::random(identity.generation() + 1);
        tracing::debug!(
            generation = next.generation(),
            user_agent = next.user_agent(),
            "Rotated identity"
        );
        *identity = Arc::new(next);
    }

    /// GET with the retry procedure, returning the response whatever its status
    ///
    /// # Errors
    ///
    /// `NetworkUnavailable` when every attempt timed out or failed to connect,
    /// `UnexpectedTransport` as soon as any other transport failure occurs.
    pub async fn request(&self, url: &str) -> Result<RawResponse, FetchError> {
        let result = with_retry_if(
            &self.retry,
            move |attempt| async move {
                let identity = self.identity().await;
                tracing::trace!(url = %url, attempt, generation = identity.generation(), "Sending request");
                self.transport.get(url, &identity).await
            },
            TransportError::is_retryable,
            |_| self.rotate_identity(),
        )
        .await;

        match result {
            Ok(response) => {
                tracing::debug!(url = %url, status = response.status, "Got response");
                Ok(response)
            }
            Err(RetryError::Exhausted { attempts, .. }) => {
                tracing::error!(url = %url, attempts, "Host is not accessible");
                Err(FetchError::NetworkUnavailable {
                    url: url.to_string(),
                    attempts,
                })
            }
            Err(RetryError::Aborted(e)) => {
                tracing::error!(url = %url, error = %e, "Unexpected transport error");
                Err(FetchError::UnexpectedTransport(e.to_string()))
            }
        }
    }

    /// Fetch a page and decode its body
    ///
    /// # Errors
    ///
    /// Everything `request` reports, plus `Status` for non-2xx answers and
    /// `Decode` for undecodable bodies.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.request(url).await?;

        if !response.is_success() {
            tracing::warn!(url = %url, status = response.status, "Unexpected status");
            return Err(FetchError::Status(response.status));
        }

        decode_body(&response.body, response.content_type.as_deref().unwrap_or(""))
    }

    /// Check that the host answers, rotating identity while it refuses us
    ///
    /// # Errors
    ///
    /// `IdentityExhausted` after `max_rotations` rotations still met 401/403,
    /// `UpstreamUnhealthy` for any other non-2xx status, and fetch failures as-is.
    pub async fn probe(&self, url: &str) -> Result<(), FetchError> {
        tracing::trace!(url = %url, "Testing session");
        let mut response = self.request(url).await?;

        if response.status == 200 {
            tracing::info!(url = %url, "Session is ok, host is available");
            return Ok(());
        }

        let mut rotations = 0;
        while matches!(response.status, 401 | 403) {
            if rotations >= self.max_rotations {
                tracing::error!(rotations, "Failed to update session");
                return Err(FetchError::IdentityExhausted { rotations });
            }
            rotations += 1;
            tracing::warn!(status = response.status, rotations, "Host refused us, updating identity");
            self.rotate_identity().await;
            response = self.request(url).await?;
        }

        if !response.is_success() {
            tracing::error!(status = response.status, "Host returned unhealthy status");
            return Err(FetchError::UpstreamUnhealthy(response.status));
        }

        tracing::info!(rotations, "Updated session");
        Ok(())
    }

    /// Fetch once and report status and timing
    pub async fn ping(&self, url: &str) -> Result<PingReport, FetchError> {
        let response = self.request(url).await?;
        let millis = response.elapsed.as_millis() as f64;

        Ok(PingReport {
            status: status_description(response.status).to_string(),
            code: response.status,
            time: millis / 1000.0,
        })
    }
}

/// Decode bytes to a string honoring the declared charset
///
/// Tries, in order: the `Content-Type` charset, strict UTF-8, a `<meta>`
/// charset in the first kilobyte, then windows-1251. A step whose decoding
/// reports errors falls through to the next one.
pub fn decode_body(bytes: &[u8], content_type: &str) -> Result<String, FetchError> {
    if let Some(encoding) = charset_of(content_type) {
        match decode_with(encoding, bytes) {
            Ok(text) => return Ok(text),
            Err(e) => tracing::debug!(error = %e, "Body does not match declared charset, sniffing"),
        }
    }

    if let Ok(text) = decode_with(UTF_8, bytes) {
        return Ok(text);
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]).to_lowercase();
    if let Some(encoding) = charset_of(&head) {
        if let Ok(text) = decode_with(encoding, bytes) {
            return Ok(text);
        }
    }

    decode_with(WINDOWS_1251, bytes)
}

fn charset_of(text: &str) -> Option<&'static Encoding> {
    let lower = text.to_lowercase();
    let start = lower.find("charset=")? + "charset=".len();
    let label: String = lower[start..]
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect();
    Encoding::for_label(label.as_bytes())
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> Result<String, FetchError> {
    let (cow, _encoding, had_errors) = encoding.decode(bytes);

    if had_errors {
        return Err(FetchError::Decode(format!("{} decoding errors", encoding.name())));
    }

    Ok(cow.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_retryable() {
        assert!(TransportError::Timeout.is_retryable());
        assert!(TransportError::Connect("refused".to_string()).is_retryable());
        assert!(!TransportError::Other("tls".to_string()).is_retryable());
    }

    #[test]
    fn test_status_description() {
        assert_eq!(status_description(200), "OK");
        assert_eq!(status_description(403), "Forbidden");
        assert_eq!(status_description(299), "Unknown status");
    }

    #[test]
    fn test_decode_utf8() {
        let text = "Расписание занятий";
        let decoded = decode_body(text.as_bytes(), "text/html; charset=utf-8");
        assert_eq!(decoded.unwrap(), text);
    }

    #[test]
    fn test_decode_windows_1251_declared() {
        let (bytes, _, _) = WINDOWS_1251.encode("Понедельник");
        let decoded = decode_body(&bytes, "text/html; charset=windows-1251");
        assert_eq!(decoded.unwrap(), "Понедельник");
    }

    #[test]
    fn test_decode_windows_1251_meta() {
        let html = r#"<html><head><meta http-equiv="Content-Type" content="text/html; charset=windows-1251"></head><body>Вторник</body></html>"#;
        let (bytes, _, _) = WINDOWS_1251.encode(html);
        let decoded = decode_body(&bytes, "text/html").unwrap();
        assert!(decoded.contains("Вторник"));
    }

    #[test]
    fn test_decode_windows_1251_fallback() {
        let (bytes, _, _) = WINDOWS_1251.encode("Среда");
        let decoded = decode_body(&bytes, "");
        assert_eq!(decoded.unwrap(), "Среда");
    }

    #[test]
    fn test_charset_label() {
        assert_eq!(charset_of("text/html; charset=cp1251"), Some(WINDOWS_1251));
        assert_eq!(charset_of("text/html; charset=\"UTF-8\""), Some(UTF_8));
        assert_eq!(charset_of("text/html"), None);
    }

    #[test]
    fn test_decode_mislabelled_windows_1251() {
        let (bytes, _, _) = WINDOWS_1251.encode("<h1>Понедельник</h1>");
        let decoded = decode_body(&bytes, "text/html; charset=utf-8");
        assert_eq!(decoded.unwrap(), "<h1>Понедельник</h1>");
    }

    #[test]
    fn test_stale_identity_does_not_replace_session() {
        let transport = HttpTransport::new(Duration::from_secs(5));

        transport.client_for(&Identity::random(2)).unwrap();
        assert_eq!(transport.cached_generation(), Some(2));

        // An in-flight request on an older identity gets its own client
        transport.client_for(&Identity::random(1)).unwrap();
        assert_eq!(transport.cached_generation(), Some(2));

        transport.client_for(&Identity::random(3)).unwrap();
        assert_eq!(transport.cached_generation(), Some(3));
    }
}
