//! Streaming HTTP download into the destination path.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use romdl_core::{TransferError, TransferResult};

use super::{ProgressSink, TransferJob, TransferStrategy};

/// Generic direct download. Matches every `http`/`https` URL.
#[derive(Clone)]
pub struct DirectHttpStrategy {
    client: reqwest::Client,
}

impl DirectHttpStrategy {
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Strategy with a client identifying as romdl.
    pub fn with_default_client() -> TransferResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("romdl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransferError::other(e.to_string()))?;
        Ok(Self::new(client))
    }

    /// Stream `job.url` to `job.destination`, optionally with a bearer token.
    ///
    /// Bytes go to a `.part` sibling first and are renamed into place only
    /// after the stream ends, so a present destination means a whole file.
    pub(crate) async fn fetch(
        &self,
        job: &TransferJob,
        bearer: Option<&str>,
        sink: &dyn ProgressSink,
    ) -> TransferResult<()> {
        let mut request = self.client.get(&job.url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = tokio::select! {
            biased;
            () = job.cancel.cancelled() => return Err(TransferError::Cancelled),
            resp = request.send() => resp.map_err(|e| TransferError::network(e.to_string()))?,
        };
        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::network_with_status(
                format!("HTTP {status}"),
                status.as_u16(),
            ));
        }
        let total = response.content_length();

        if let Some(parent) = job.destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut part_name = job.destination.clone().into_os_string();
        part_name.push(".part");
        let part_path = std::path::PathBuf::from(part_name);
        let file = tokio::fs::File::create(&part_path).await?;

        let started = Instant::now();
        let downloaded = match stream_body(job, response, file, total, started, sink).await {
            Ok(downloaded) => downloaded,
            Err(e) => {
                // The file handle is closed by now.
                let _ = tokio::fs::remove_file(&part_path).await;
                if e.is_cancelled() {
                    debug!(target: "romdl.download", task_id = %job.task_id, "transfer cancelled");
                }
                return Err(e);
            }
        };
        if let Err(e) = tokio::fs::rename(&part_path, &job.destination).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(e.into());
        }
        sink.report(downloaded, total.or(Some(downloaded)), speed(downloaded, started))
            .await;

        info!(
            target: "romdl.download",
            task_id = %job.task_id,
            bytes = downloaded,
            path = %job.destination.display(),
            "transfer finished"
        );
        Ok(())
    }
}

/// Copy the response body into `file`, reporting after every chunk.
///
/// Consumes `file` so it is closed on every return path.
async fn stream_body(
    job: &TransferJob,
    response: reqwest::Response,
    mut file: tokio::fs::File,
    total: Option<u64>,
    started: Instant,
    sink: &dyn ProgressSink,
) -> TransferResult<u64> {
    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();
    loop {
        let next = tokio::select! {
            biased;
            () = job.cancel.cancelled() => return Err(TransferError::Cancelled),
            chunk = stream.next() => chunk,
        };
        let Some(chunk) = next else {
            break;
        };
        let chunk = chunk.map_err(|e| TransferError::network(e.to_string()))?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        sink.report(downloaded, total, speed(downloaded, started)).await;
    }
    file.flush().await?;
    file.sync_all().await?;
    Ok(downloaded)
}

/// Average rate in KiB/s since `started`.
#[allow(clippy::cast_precision_loss)]
fn speed(downloaded: u64, started: Instant) -> f64 {
    let secs = started.elapsed().as_secs_f64();
    if secs <= f64::EPSILON {
        return 0.0;
    }
    downloaded as f64 / 1024.0 / secs
}

#[async_trait]
impl TransferStrategy for DirectHttpStrategy {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn matches(&self, url: &str) -> bool {
        let lowered = url.trim_start().to_ascii_lowercase();
        lowered.starts_with("http://") || lowered.starts_with("https://")
    }

    async fn run(&self, job: TransferJob, sink: Arc<dyn ProgressSink>) -> TransferResult<()> {
        self.fetch(&job, None, sink.as_ref()).await
    }
}
