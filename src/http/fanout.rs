use std::time::Duration;

use reqwest::Client;
use tokio::time::Instant;
use tracing::warn;

use super::fetch::{FetchRequest, FetchResult, fetch};

/// Every response of one fan-out plus its totals.
#[derive(Debug, Clone, Default)]
pub struct FanoutResult {
    pub responses: Vec<FetchResult>,
    pub total_bytes: u64,
    /// Sum of individual fetch durations.
    pub linear_time: Duration,
    /// Wall time from the first spawn until the last fetch finished.
    pub wall_time: Duration,
}

/// Fetches every URL concurrently and waits for all of them.
///
/// One task is spawned per URL before anything is awaited; there is no cap
/// on in-flight requests. Callers should key the responses by URL rather
/// than by position.
pub async fn fetch_all(client: &Client, urls: Vec<String>, template: &FetchRequest) -> FanoutResult {
    let start = Instant::now();
    let handles: Vec<_> = urls
        .into_iter()
        .map(|url| {
            let client = client.clone();
            let request = template.with_url(url);
            let slot_url = request.url.clone();
            (
                slot_url,
                tokio::spawn(async move { fetch(&client, &request).await }),
            )
        })
        .collect();

    let mut result = FanoutResult {
        responses: Vec::with_capacity(handles.len()),
        ..FanoutResult::default()
    };
    for (url, handle) in handles {
        let response = match handle.await {
            Ok(response) => response,
            Err(err) => {
                warn!("Fetch task for {} did not complete: {}", url, err);
                FetchResult::connection_error(url, Duration::ZERO, format!("task failed: {}", err))
            }
        };
        result.total_bytes = result.total_bytes.saturating_add(response.bytes);
        result.linear_time = result.linear_time.saturating_add(response.elapsed);
        result.responses.push(response);
    }
    result.wall_time = start.elapsed();
    result
}
