//! HTTP client for retailer product pages and rating-source search pages.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;

/// Fetches a page body as text.
///
/// This is the network seam of the lookup pipeline; tests substitute canned
/// pages for it.
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` with a GET request and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns a [`ScraperError`] on network failure or a non-success status.
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send;
}

/// `reqwest`-backed [`PageFetcher`].
///
/// Non-2xx responses are returned as typed errors. Requests are never retried;
/// a later independent lookup is the retry path.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates an `HttpClient` with the given `User-Agent`.
    ///
    /// `timeout_secs` of `None` leaves requests without a total timeout, so a
    /// hung server stalls the caller until the connection drops.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: Option<u64>, user_agent: &str) -> Result<Self, ScraperError> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent);
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl PageFetcher for HttpClient {
    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        tracing::debug!(url, "fetching page");

        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "sv-SE,sv;q=0.9,en;q=0.8")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}
