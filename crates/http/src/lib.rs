//! # racksearch-http
//!
//! HTTP client for fetching the book sheet.
//!
//! The sheet is downloaded as CSV from the URL the configuration resolves
//! to and parsed into a [`Table`]. Supports HTTP/2 via ALPN negotiation with
//! fallback to HTTP/1.1.

use racksearch_core::{export_url, Config, RackError, RackResult};
use racksearch_sheet::Table;
use reqwest::Client;
use std::time::Duration;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP client for the sheet source.
#[derive(Debug, Clone)]
pub struct SheetClient {
    client: Client,
}

impl SheetClient {
    /// Constructs a new `SheetClient` with a 10-second timeout.
    ///
    /// # Errors
    ///
    /// Returns a `RackError::Http` if building the underlying HTTP client fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use racksearch_http::SheetClient;
    /// let client = SheetClient::new().expect("failed to create SheetClient");
    /// ```
    pub fn new() -> RackResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Constructs a `SheetClient` with a custom per-request timeout.
    ///
    /// Proxy discovery is disabled for the underlying reqwest client.
    ///
    /// # Errors
    ///
    /// Returns `RackError::Http` if building the underlying HTTP client fails.
    pub fn with_timeout(timeout_secs: u64) -> RackResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            // Disable system proxy lookup to avoid macOS system-configuration issues
            .no_proxy()
            .build()
            .map_err(|e| RackError::Http(e.to_string()))?;

        Ok(Self { client })
    }

    /// GET `url` and return the response body as text.
    ///
    /// # Errors
    ///
    /// Returns `RackError::Http` if the request fails or the status is not 2xx.
    pub async fn fetch_csv(&self, url: &str) -> RackResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RackError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RackError::Http(format!(
                "HTTP {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .text()
            .await
            .map_err(|e| RackError::Http(format!("Failed to read body: {e}")))
    }

    /// Fetch the configured sheet and parse it into a table.
    ///
    /// # Errors
    ///
    /// Returns `RackError::NotConfigured` or `RackError::InvalidSheetUrl` for
    /// a bad configuration, `RackError::Http` for transport failures and
    /// `RackError::Sheet` when the body is not usable CSV.
    pub async fn fetch_table(&self, config: &Config) -> RackResult<Table> {
        let url = export_url(config)?;
        tracing::info!(%url, "fetching sheet");

        let body = self.fetch_csv(&url).await?;
        let mut table = Table::from_csv_str(&body)?;
        table.set_name(&config.sheet_name);

        tracing::info!(
            rows = table.row_count(),
            columns = table.col_count(),
            "sheet loaded"
        );
        Ok(table)
    }
}
