//! Blocking HTTP GET over libcurl (via the `curl` crate).
//!
//! Callers depend on the [`HttpClient`] trait so tests can serve canned bodies
//! without a network.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::time::Duration;

/// Transport-level failure that is not a curl error.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Response had a non-2xx status.
    #[error("GET {url} returned HTTP {code}")]
    Status { url: String, code: u32 },
}

/// Minimal GET interface used by the release client and the asset downloader.
pub trait HttpClient {
    /// GET `url` and stream the body into `sink`. Returns the number of bytes written.
    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64>;

    /// GET `url` and return the whole body.
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        self.download(url, &mut body)?;
        Ok(body)
    }
}

/// Production client: one `curl::easy::Easy` handle per request.
#[derive(Debug, Clone)]
pub struct CurlClient {
    user_agent: String,
    connect_timeout: Duration,
}

impl Default for CurlClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CurlClient {
    pub fn new() -> Self {
        Self {
            user_agent: format!("pgeup/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout: Duration::from_secs(30),
        }
    }

    fn easy(&self, url: &str) -> Result<curl::easy::Easy> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url).context("invalid URL")?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        // GitHub's API rejects requests without a User-Agent.
        easy.useragent(&self.user_agent)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(Duration::from_secs(60))?;
        Ok(easy)
    }
}

impl HttpClient for CurlClient {
    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
        let mut easy = self.easy(url)?;
        let mut written = 0u64;
        let mut write_err: Option<io::Error> = None;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match sink.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(e).with_context(|| format!("write response body of {}", url));
        }
        performed.with_context(|| format!("GET {} failed", url))?;

        let code = easy.response_code().context("no response code")?;
        if !(200..300).contains(&code) {
            return Err(HttpError::Status {
                url: url.to_string(),
                code,
            }
            .into());
        }

        tracing::trace!(url, bytes = written, "copied response body");
        Ok(written)
    }
}
