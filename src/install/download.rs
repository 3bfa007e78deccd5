//! Streamed artifact download with an overall deadline
//!
//! One GET per file, no retries. The caller-specified timeout bounds the
//! whole fetch; hitting it aborts only this step and reports how far the
//! transfer got.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use futures_util::StreamExt;
use log::{debug, info};
use tokio::io::AsyncWriteExt;
use tokio::time::{Instant, timeout_at};

/// Initial connection timeout, separate from the per-request deadline
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP client for artifact and script downloads
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("orbit-install/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")
}

/// Fetch `url` into `dir`, keeping the file's name from the URL path.
///
/// Fails on connection errors, non-2xx responses, and on exceeding
/// `timeout` across the whole transfer.
pub async fn fetch_to(
    client: &reqwest::Client,
    url: &str,
    dir: &Path,
    timeout: Duration,
) -> Result<PathBuf> {
    let file_name = url
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| anyhow!("cannot derive a file name from {url}"))?;
    let path = dir.join(file_name);

    let deadline = Instant::now() + timeout;

    let response = timeout_at(deadline, client.get(url).send())
        .await
        .map_err(|_| anyhow!("timed out connecting to {url}"))?
        .with_context(|| format!("request to {url} failed"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("{url} returned HTTP {status}");
    }
    let total_bytes = response.content_length();

    let mut file = tokio::fs::File::create(&path)
        .await
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    loop {
        let chunk = match timeout_at(deadline, stream.next()).await {
            Ok(Some(Ok(chunk))) => chunk,
            Ok(Some(Err(e))) => return Err(e).with_context(|| format!("transfer from {url} failed")),
            Ok(None) => break,
            Err(_) => bail!(
                "download of {url} timed out after {}s ({downloaded}{} bytes received)",
                timeout.as_secs(),
                total_bytes
                    .map(|total| format!("/{total}"))
                    .unwrap_or_default(),
            ),
        };
        file.write_all(&chunk)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        downloaded += chunk.len() as u64;
    }

    file.flush()
        .await
        .with_context(|| format!("failed to flush {}", path.display()))?;

    debug!("GET {url} -> {status}");
    info!("downloaded {downloaded} bytes to {}", path.display());
    Ok(path)
}
