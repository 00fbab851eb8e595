use reqwest::Client;
use reqwest::header::{ACCEPT_RANGES, CONTENT_LENGTH};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::zip::{
    RangeHeader, ZipCrcs, crc_sum, parse_central_directory, zip_cd_range_header,
    zip_tail_range_header,
};
use anyhow::{Result, anyhow, bail};

/// Settings for talking to a remote server.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Per-request timeout
    pub timeout: Duration,
    /// Attempts allowed for connect and timeout failures
    pub max_retry: u32,
    /// Backoff step; the n-th retry waits `n * retry_backoff`
    pub retry_backoff: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retry: 10,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// HTTP Range reader for remote ZIP files
///
/// Reads just the tail window and the Central Directory of a remote archive,
/// so the CRC identity of a large ZIP is known before (or instead of)
/// downloading it.
pub struct HttpRangeReader {
    client: Client,
    url: String,
    size: u64,
    transferred_bytes: AtomicU64,
    options: HttpOptions,
}

impl HttpRangeReader {
    /// Create a new HTTP Range reader with default options
    ///
    /// This will send a HEAD request to verify Range support and get file size
    pub async fn new(url: String) -> Result<Self> {
        Self::with_options(url, HttpOptions::default()).await
    }

    pub async fn with_options(url: String, options: HttpOptions) -> Result<Self> {
        let client = Client::builder().timeout(options.timeout).build()?;

        // Send HEAD request to check capabilities
        let resp = client.head(&url).send().await?;

        if !resp.status().is_success() {
            bail!("HTTP request failed with status: {}", resp.status());
        }

        // Check if server supports Range requests
        let accept_ranges = resp
            .headers()
            .get(ACCEPT_RANGES)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("none");

        if !accept_ranges.contains("bytes") {
            bail!("Remote server does not support Range requests");
        }

        // Get file size from Content-Length
        let size = resp
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| anyhow!("Remote server did not return Content-Length"))?;

        debug!(url = %url, size, "remote file supports range requests");

        Ok(Self {
            client,
            url,
            size,
            transferred_bytes: AtomicU64::new(0),
            options,
        })
    }

    /// Total size reported by the server
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Get total bytes transferred from network
    pub fn transferred_bytes(&self) -> u64 {
        self.transferred_bytes.load(Ordering::Relaxed)
    }

    /// Fetch the bytes selected by `range`.
    ///
    /// Connect and timeout failures, and bodies shorter than the range, are
    /// retried with a growing delay; any response other than 206 Partial
    /// Content is an error.
    pub async fn fetch(&self, range: &RangeHeader) -> Result<Vec<u8>> {
        let expected = range.expected_len(self.size);
        let mut retry_count = 0;

        loop {
            let result = self
                .client
                .get(&self.url)
                .header(range.name(), range.value())
                .send()
                .await;

            let failure = match result {
                Ok(resp) => {
                    if resp.status() != reqwest::StatusCode::PARTIAL_CONTENT {
                        bail!("HTTP request failed with status: {}", resp.status());
                    }

                    let bytes = resp.bytes().await?;
                    self.transferred_bytes
                        .fetch_add(bytes.len() as u64, Ordering::Relaxed);
                    if bytes.len() as u64 >= expected {
                        debug!(range = range.value(), len = bytes.len(), "fetched range");
                        return Ok(bytes.to_vec());
                    }
                    format!("short read, got {} of {} bytes", bytes.len(), expected)
                }
                Err(e) if e.is_timeout() || e.is_connect() => e.to_string(),
                Err(e) => return Err(e.into()),
            };

            retry_count += 1;
            if retry_count >= self.options.max_retry {
                bail!("Max retries exceeded: {failure}");
            }
            warn!(
                "Range request failed, retry {}/{}: {}",
                retry_count, self.options.max_retry, failure
            );
            tokio::time::sleep(self.options.retry_backoff * retry_count).await;
        }
    }

    /// CRC32 of every entry, read through two range requests.
    ///
    /// A remote file with no EOCD record in its tail gives an empty map.
    pub async fn zip_crcs(&self) -> Result<ZipCrcs> {
        let tail_data = self.fetch(&zip_tail_range_header(self.size)).await?;

        let Some((total_records, cd_range)) = zip_cd_range_header(&tail_data) else {
            debug!(url = %self.url, "no EOCD record in remote tail");
            return Ok(ZipCrcs::new());
        };

        let cd_data = self.fetch(&cd_range).await?;
        Ok(parse_central_directory(&cd_data, total_records as usize))
    }

    /// CRC sum of the remote archive, `""` if it has none.
    pub async fn crc_sum(&self) -> Result<String> {
        Ok(crc_sum(&self.zip_crcs().await?))
    }
}
