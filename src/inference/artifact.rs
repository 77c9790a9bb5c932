//! Locating the model file, fetching it once if it is missing.

use backon::{ExponentialBuilder, Retryable};
use futures::stream::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use url::Url;

use crate::error::{IsRetryable, PestError};

fn default_retry_policy() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_secs(1))
        .with_max_delay(Duration::from_secs(8))
        .with_max_times(3)
        .with_jitter()
}

pub fn http_client(timeout: Duration) -> Result<reqwest::Client, PestError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("pest-detect/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Return `path` if it already exists, otherwise download `url` into it.
pub async fn ensure_local(
    path: &Path,
    url: Option<&Url>,
    client: &reqwest::Client,
) -> Result<PathBuf, PestError> {
    if tokio::fs::try_exists(path).await? {
        return Ok(path.to_path_buf());
    }
    let Some(url) = url else {
        return Err(PestError::ModelUnavailable(format!(
            "{} does not exist and no download_url is configured",
            path.display()
        )));
    };

    info!(path = %path.display(), url = %url, "model artifact missing; downloading");

    let written = (|| async { download_to(url, path, client).await })
        .retry(default_retry_policy())
        .when(|e: &PestError| e.is_retryable())
        .notify(|err, dur: Duration| {
            warn!("model download retrying after error {}, sleeping {:?}", err, dur);
        })
        .await?;

    info!(path = %path.display(), bytes = written, "model artifact downloaded");
    Ok(path.to_path_buf())
}

/// Stream into `<path>.part` and rename, so a crash never leaves a truncated
/// artifact under the real name.
async fn download_to(url: &Url, path: &Path, client: &reqwest::Client) -> Result<u64, PestError> {
    let resp = client.get(url.clone()).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(PestError::DownloadStatus(status));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let partial = partial_path(path);
    let written = match write_body(resp, &partial).await {
        Ok(n) => n,
        Err(e) => {
            if let Err(rm) = tokio::fs::remove_file(&partial).await {
                warn!(path = %partial.display(), error = %rm, "failed to remove partial download");
            }
            return Err(e);
        }
    };

    tokio::fs::rename(&partial, path).await?;
    Ok(written)
}

async fn write_body(resp: reqwest::Response, partial: &Path) -> Result<u64, PestError> {
    let mut file = tokio::fs::File::create(partial).await?;
    let mut written = 0u64;
    let mut body = resp.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
