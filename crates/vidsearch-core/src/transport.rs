//! HTTP transport with rate limiting for the video search API
//!
//! The client only needs "GET this path on this host and give me the body",
//! expressed by the [`Transport`] trait. [`HttpTransport`] is the blocking
//! reqwest implementation used by default.

use std::sync::{Mutex, PoisonError};
use std::thread::sleep;
use std::time::{Duration, Instant};

use log::debug;

use crate::error::{Result, VidsearchError};
use crate::url::build_request_url;

const DEFAULT_HOST: &str = "xml.truveo.com";
const DEFAULT_PATH: &str = "/apiv3";
const USER_AGENT: &str = concat!("vidsearch/", env!("CARGO_PKG_VERSION"));

/// Configuration for the client and its HTTP transport
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Application ID sent as `appid` with every request
    pub app_id: String,
    /// API host (default: xml.truveo.com)
    pub host: String,
    /// API port; 443 switches to https (default: 80)
    pub port: u16,
    /// API path (default: /apiv3)
    pub path: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Maximum requests per second (default: 2.0)
    pub requests_per_second: f64,
    /// User-Agent header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Default configuration for the given application ID
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            host: DEFAULT_HOST.to_string(),
            port: 80,
            path: DEFAULT_PATH.to_string(),
            timeout_secs: 30,
            requests_per_second: 2.0,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Rate limiter to control request frequency
///
/// Ensures requests are spaced at least `min_interval` apart. Blocks the
/// calling thread while waiting.
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    ///
    /// A non-positive rate disables limiting.
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = if requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / requests_per_second)
        } else {
            Duration::ZERO
        };
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Acquire permission to make a request
    ///
    /// If called before the minimum interval has passed since the last request,
    /// this method sleeps until the interval has elapsed.
    pub fn acquire(&self) {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed);
            }
        }

        *last = Some(Instant::now());
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// The HTTP capability the client depends on
///
/// Performs a GET of `path_and_query` on `host:port` and returns the raw
/// response body.
pub trait Transport {
    fn get(&self, host: &str, port: u16, path_and_query: &str) -> Result<String>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, host: &str, port: u16, path_and_query: &str) -> Result<String> {
        (**self).get(host, port, path_and_query)
    }
}

/// Blocking HTTP transport with rate limiting
///
/// No retries: a failed request is reported once and the client turns it
/// into an error page.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    rate_limiter: RateLimiter,
}

impl HttpTransport {
    /// Create a transport from the timeout, rate and user agent of `config`
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(VidsearchError::HttpError)?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(config.requests_per_second),
        })
    }

    /// Get a reference to the rate limiter (for testing)
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}

impl Transport for HttpTransport {
    /// # Errors
    /// - `InvalidUrl` - host/path do not form a valid URL
    /// - `HttpError` - network errors and 5xx responses
    /// - `RateLimited` - server returned 429
    /// - `NotFound` - server returned 404
    fn get(&self, host: &str, port: u16, path_and_query: &str) -> Result<String> {
        let url = build_request_url(host, port, path_and_query);
        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| VidsearchError::InvalidUrl(format!("{}: {}", url, e)))?;

        self.rate_limiter.acquire();
        debug!("GET {}", url);

        let response = self
            .client
            .get(parsed)
            .send()
            .map_err(VidsearchError::HttpError)?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(VidsearchError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(VidsearchError::NotFound(url));
        }

        if status.is_server_error() {
            response
                .error_for_status_ref()
                .map_err(VidsearchError::HttpError)?;
        }

        // Error documents may arrive with a 4xx status; the body is still
        // handed to the parser so the remote code is preserved.
        response.text().map_err(VidsearchError::HttpError)
    }
}
