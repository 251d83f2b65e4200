//! Snapshot download, single-file or split into numbered parts.

use futures::StreamExt;
use reqwest::header::CONTENT_LENGTH;
use reqwest::Response;

use crate::client::HttpClient;
use crate::config::SNAPSHOT_FILE_NAME;
use crate::error::{Error, Result};
use crate::export::progress::PhaseProgress;

/// Upper bound on buffer space reserved from a declared `Content-Length`.
const MAX_PREALLOCATION: u64 = 256 * 1024 * 1024;

/// Size and count of the parts making up a split snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartsInfo {
    pub count: usize,
    pub total_size: u64,
}

/// Check whether a snapshot URL names the canonical, split-delivered file.
pub fn is_split_snapshot(url: &str) -> bool {
    url.ends_with(&format!("/{}", SNAPSHOT_FILE_NAME))
}

/// URL of part `index`, e.g. `xlog.db.gz00`.
pub fn part_url(base_url: &str, index: usize) -> String {
    format!("{}{:02}", base_url, index)
}

/// Download the compressed snapshot, reassembling parts when needed.
///
/// Progress is reported as phase-local fractions over bytes received.
pub async fn fetch_snapshot(
    client: &HttpClient,
    url: &str,
    progress: &PhaseProgress<'_>,
) -> Result<Vec<u8>> {
    if is_split_snapshot(url) {
        fetch_split(client, url, progress).await
    } else {
        fetch_single(client, url, progress).await
    }
}

/// Download a single resource.
async fn fetch_single(
    client: &HttpClient,
    url: &str,
    progress: &PhaseProgress<'_>,
) -> Result<Vec<u8>> {
    let response = client.get(url).await?;
    let total = header_content_length(&response).filter(|&t| t > 0);

    let mut buffer = Vec::with_capacity(capacity_hint(total.unwrap_or(0)));
    read_body(response, &mut buffer, |received| {
        if let Some(total) = total {
            let fraction = received as f64 / total as f64;
            progress.report(
                fraction,
                &format!("Downloading database... ({}%)", percent(fraction)),
            );
        }
    })
    .await?;

    tracing::debug!("Downloaded {} bytes from {}", buffer.len(), url);
    Ok(buffer)
}

/// Probe and download `<url>00`, `<url>01`, ... and concatenate them in order.
async fn fetch_split(
    client: &HttpClient,
    base_url: &str,
    progress: &PhaseProgress<'_>,
) -> Result<Vec<u8>> {
    let parts = probe_parts(client, base_url).await?;
    tracing::info!(
        "Snapshot split into {} part(s), {} bytes",
        parts.count,
        parts.total_size
    );

    let mut buffer = Vec::with_capacity(capacity_hint(parts.total_size));

    for index in 0..parts.count {
        let url = part_url(base_url, index);
        let response = client.get(&url).await?;
        let offset = buffer.len() as u64;

        read_body(response, &mut buffer, |received| {
            if parts.total_size > 0 {
                let fraction = (offset + received) as f64 / parts.total_size as f64;
                progress.report(
                    fraction,
                    &format!(
                        "Downloading part {}... ({}%)",
                        index + 1,
                        percent(fraction)
                    ),
                );
            }
        })
        .await?;

        tracing::debug!("Part {} done, {} bytes so far", index, buffer.len());
    }

    Ok(buffer)
}

/// Count the available parts with metadata-only requests.
///
/// Probing stops at the first part that is not served; finding none is fatal.
pub async fn probe_parts(client: &HttpClient, base_url: &str) -> Result<PartsInfo> {
    let mut info = PartsInfo {
        count: 0,
        total_size: 0,
    };

    loop {
        let url = part_url(base_url, info.count);
        let response = match client.head(&url).await {
            Ok(response) => response,
            Err(e) if info.count > 0 => {
                tracing::debug!("Probe for {} failed, assuming no more parts: {}", url, e);
                break;
            }
            Err(e) => return Err(e),
        };

        if !response.status().is_success() {
            tracing::debug!("No part at {} (HTTP {})", url, response.status());
            break;
        }

        info.total_size = info
            .total_size
            .saturating_add(header_content_length(&response).unwrap_or(0));
        info.count += 1;
    }

    if info.count == 0 {
        return Err(Error::NoSnapshotParts(base_url.to_string()));
    }

    Ok(info)
}

/// Stream a response body into `buffer`, calling `on_chunk` with the bytes
/// received so far for this response.
async fn read_body(
    response: Response,
    buffer: &mut Vec<u8>,
    mut on_chunk: impl FnMut(u64),
) -> Result<()> {
    let mut stream = response.bytes_stream();
    let mut received: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        buffer.extend_from_slice(&chunk);
        received += chunk.len() as u64;
        on_chunk(received);
    }

    Ok(())
}

/// Read `Content-Length` from the headers. `Response::content_length` reflects
/// the body, which is empty for HEAD requests.
fn header_content_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Initial buffer capacity for a body of `declared` bytes.
fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOCATION)).unwrap_or(0)
}

fn percent(fraction: f64) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u32
}
