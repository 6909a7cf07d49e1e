use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tokio::time::Instant;
use tracing::debug;

use crate::assets::{AssetExtractor, AssetKind};
use crate::error::AppResult;
use crate::metrics::serialize_micros;

use super::fanout::{FanoutResult, fetch_all};
use super::fetch::{FetchRequest, FetchResult, fetch};
use super::resolve::resolve_asset_url;

/// One page plus all of its assets.
#[derive(Debug, Clone, Serialize)]
pub struct PageFetchResult {
    pub base: FetchResult,
    pub js: Vec<FetchResult>,
    pub css: Vec<FetchResult>,
    pub img: Vec<FetchResult>,
    #[serde(rename = "total_time_us", serialize_with = "serialize_micros")]
    pub total_time: Duration,
    #[serde(rename = "linear_time_us", serialize_with = "serialize_micros")]
    pub linear_time: Duration,
    pub total_bytes: u64,
}

impl PageFetchResult {
    #[must_use]
    pub fn assets(&self, kind: AssetKind) -> &[FetchResult] {
        match kind {
            AssetKind::Js => &self.js,
            AssetKind::Css => &self.css,
            AssetKind::Img => &self.img,
        }
    }

    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.js
            .len()
            .saturating_add(self.css.len())
            .saturating_add(self.img.len())
    }
}

/// Runs one round: the page, then its scripts, stylesheets and images.
///
/// The page is always fetched with body capture so its assets can be found.
/// The three asset kinds are fanned out concurrently, each on its own task.
///
/// # Errors
///
/// Returns an error when an asset reference cannot be resolved against the
/// page URL, or when a fan-out task panics.
pub async fn run_round(
    client: &Client,
    extractor: &AssetExtractor,
    request: &FetchRequest,
) -> AppResult<PageFetchResult> {
    let start = Instant::now();
    let base = fetch(client, &request.with_capture_body(true)).await;

    let found = base
        .body
        .as_deref()
        .map(|body| extractor.extract(body))
        .unwrap_or_default();
    let js_urls = resolve_all(&request.url, &found.js)?;
    let css_urls = resolve_all(&request.url, &found.css)?;
    let img_urls = resolve_all(&request.url, &found.img)?;

    let js_task = spawn_fanout(client, js_urls, request);
    let css_task = spawn_fanout(client, css_urls, request);
    let img_task = spawn_fanout(client, img_urls, request);
    let js = js_task.await?;
    let css = css_task.await?;
    let img = img_task.await?;
    let total_time = start.elapsed();

    let linear_time = base
        .elapsed
        .saturating_add(js.linear_time)
        .saturating_add(css.linear_time)
        .saturating_add(img.linear_time);
    let total_bytes = base
        .bytes
        .saturating_add(js.total_bytes)
        .saturating_add(css.total_bytes)
        .saturating_add(img.total_bytes);
    let base = if request.capture_body {
        base
    } else {
        base.without_body()
    };

    let result = PageFetchResult {
        base,
        js: js.responses,
        css: css.responses,
        img: img.responses,
        total_time,
        linear_time,
        total_bytes,
    };
    debug!(
        "Round for {}: {} assets, {} bytes, wall {:?}, linear {:?}",
        request.url,
        result.asset_count(),
        total_bytes,
        total_time,
        linear_time
    );
    Ok(result)
}

fn resolve_all(base: &str, references: &[String]) -> AppResult<Vec<String>> {
    references
        .iter()
        .map(|reference| resolve_asset_url(base, reference).map_err(Into::into))
        .collect()
}

fn spawn_fanout(
    client: &Client,
    urls: Vec<String>,
    template: &FetchRequest,
) -> tokio::task::JoinHandle<FanoutResult> {
    let client = client.clone();
    let template = template.clone();
    tokio::spawn(async move { fetch_all(&client, urls, &template).await })
}
