//! HTTP event feed client
//!
//! Implements `EventSource` over the remote events API with timeout
//! handling and exponential-backoff retry for network-class failures.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

use crate::record::EventRecord;
use event_core::Event;

/// Errors that can occur while fetching events
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Unexpected status {status} from event feed")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Response body failed to parse
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Check whether the error is network-class and worth retrying
    ///
    /// Status set mirrors the usual transient-failure codes; application
    /// errors (4xx other than 408/425/429) are not retried.
    pub fn is_recoverable(&self) -> bool {
        match self {
            FetchError::Http(err) => err.is_timeout() || err.is_connect(),
            FetchError::Status { status } => {
                matches!(status, 408 | 425 | 429 | 500 | 502 | 503 | 504 | 522 | 524)
            }
            FetchError::Decode(_) => false,
        }
    }
}

/// Result type for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the initial try
    pub max_retries: usize,

    /// Initial delay between retries
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Backoff multiplier (2.0 for exponential backoff)
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a retry configuration with the given attempt budget
    pub fn new(max_retries: usize) -> Self {
        Self { max_retries, ..Default::default() }
    }

    /// Set the initial delay
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Calculate the delay for a given retry attempt
    pub(crate) fn calculate_delay(&self, attempt: usize) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);

        if delay > self.max_delay {
            self.max_delay
        } else {
            delay
        }
    }
}

/// Configuration for the events client
#[derive(Debug, Clone)]
pub struct EventsClientConfig {
    /// Base API URL (e.g., "https://api.nocturne.me")
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Retry policy for recoverable failures
    pub retry: RetryConfig,
}

impl Default for EventsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.nocturne.me".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("Nocturne/{}", env!("CARGO_PKG_VERSION")),
            retry: RetryConfig::default(),
        }
    }
}

impl EventsClientConfig {
    /// Create a config pointing at the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Default::default() }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// Source of event records
///
/// The store depends only on this seam, so tests can substitute an
/// in-memory implementation for the HTTP client.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch the current event list
    async fn fetch_events(&self) -> Result<Vec<Event>>;
}

/// HTTP implementation of `EventSource` over the events API
pub struct EventsClient {
    http: reqwest::Client,
    config: EventsClientConfig,
}

impl EventsClient {
    /// Create a new events client
    pub fn new(config: EventsClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { http, config })
    }

    /// The configured base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn events_url(&self) -> String {
        format!("{}/events", self.config.base_url.trim_end_matches('/'))
    }

    async fn fetch_once(&self) -> Result<Vec<Event>> {
        let response = self.http.get(self.events_url()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16() });
        }

        let body = response.text().await?;
        let records: Vec<EventRecord> = serde_json::from_str(&body)?;

        let total = records.len();
        let events: Vec<Event> = records
            .into_iter()
            .filter_map(|record| match record.sanitize() {
                Ok(event) => Some(event),
                Err(err) => {
                    tracing::warn!("Skipping invalid event record: {}", err);
                    None
                }
            })
            .collect();

        if events.len() < total {
            tracing::debug!("Dropped {} of {} event records", total - events.len(), total);
        }

        Ok(events)
    }
}

#[async_trait]
impl EventSource for EventsClient {
    async fn fetch_events(&self) -> Result<Vec<Event>> {
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            match self.fetch_once().await {
                Ok(events) => {
                    tracing::debug!("Fetched {} events", events.len());
                    return Ok(events);
                }
                Err(err) if err.is_recoverable() && attempt < retry.max_retries => {
                    let delay = retry.calculate_delay(attempt);
                    tracing::warn!(
                        "Event fetch failed (attempt {}): {}; retrying in {:?}",
                        attempt + 1,
                        err,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!("Event fetch failed: {}", err);
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = EventsClientConfig::default();
        assert_eq!(config.base_url, "https://api.nocturne.me");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("Nocturne/"));
        assert_eq!(config.retry.max_retries, 3);
    }

    #[test]
    fn test_config_builder() {
        let config = EventsClientConfig::new("https://staging.nocturne.me")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("NocturneTest/1.0")
            .with_retry(RetryConfig::new(1));

        assert_eq!(config.base_url, "https://staging.nocturne.me");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "NocturneTest/1.0");
        assert_eq!(config.retry.max_retries, 1);
    }

    #[test]
    fn test_events_url_trims_trailing_slash() {
        let client =
            EventsClient::new(EventsClientConfig::new("https://api.nocturne.me/")).unwrap();
        assert_eq!(client.events_url(), "https://api.nocturne.me/events");
    }

    #[test]
    fn test_retry_delay_is_exponential_and_capped() {
        let retry = RetryConfig::new(5)
            .with_initial_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(350));

        assert_eq!(retry.calculate_delay(0), Duration::from_millis(100));
        assert_eq!(retry.calculate_delay(1), Duration::from_millis(200));
        // 400ms exceeds the cap
        assert_eq!(retry.calculate_delay(2), Duration::from_millis(350));
    }

    #[test]
    fn test_status_error_classification() {
        assert!(FetchError::Status { status: 503 }.is_recoverable());
        assert!(FetchError::Status { status: 429 }.is_recoverable());
        assert!(!FetchError::Status { status: 404 }.is_recoverable());
        assert!(!FetchError::Status { status: 400 }.is_recoverable());
    }

    #[test]
    fn test_decode_error_is_not_recoverable() {
        let err: FetchError =
            serde_json::from_str::<Vec<EventRecord>>("not json").unwrap_err().into();
        assert!(!err.is_recoverable());
    }
}
