use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::assets::AssetKind;
use crate::metrics::{CombinedResult, UrlStats, serialize_micros};

/// Final run report, one fixed shape for every renderer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Report {
    pub base_url: String,
    pub workers: usize,
    pub rounds: u64,
    /// Requests for the page itself.
    pub requests: u64,
    /// Requests for the page and all assets.
    pub total_requests: u64,
    pub total_bytes: u64,
    #[serde(rename = "avg_page_response_us", serialize_with = "serialize_micros")]
    pub avg_page_response: Duration,
    #[serde(rename = "avg_linear_response_us", serialize_with = "serialize_micros")]
    pub avg_linear_response: Duration,
    #[serde(rename = "avg_time_to_first_byte_us", serialize_with = "serialize_micros")]
    pub avg_time_to_first_byte: Duration,
    pub success_rate_x100: u64,
    pub status: BTreeMap<String, u64>,
    pub js: Vec<AssetSummary>,
    pub css: Vec<AssetSummary>,
    pub img: Vec<AssetSummary>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AssetSummary {
    pub url: String,
    pub kind: AssetKind,
    pub count: u64,
    pub bytes: u64,
    #[serde(rename = "avg_latency_us", serialize_with = "serialize_micros")]
    pub avg_latency: Duration,
    pub success_rate_x100: u64,
    pub status: BTreeMap<String, u64>,
}

impl AssetSummary {
    #[must_use]
    pub fn from_stats(kind: AssetKind, stats: &UrlStats) -> Self {
        Self {
            url: stats.url().to_owned(),
            kind,
            count: stats.requests(),
            bytes: stats.bytes(),
            avg_latency: stats.average_duration(),
            success_rate_x100: stats.success_rate_x100(),
            status: stats.status_histogram(),
        }
    }
}

impl Report {
    #[must_use]
    pub fn from_combined(combined: &CombinedResult) -> Self {
        let stats = &combined.stats;
        let summarize = |kind: AssetKind| -> Vec<AssetSummary> {
            stats
                .assets(kind)
                .values()
                .map(|item| AssetSummary::from_stats(kind, item))
                .collect()
        };
        Self {
            base_url: stats.base.url().to_owned(),
            workers: combined.workers,
            rounds: stats.rounds,
            requests: stats.base.requests(),
            total_requests: stats.total_requests(),
            total_bytes: stats.total_bytes(),
            avg_page_response: combined.avg_round_time,
            avg_linear_response: combined.avg_linear_time,
            avg_time_to_first_byte: stats.base.average_duration(),
            success_rate_x100: stats.base.success_rate_x100(),
            status: stats.base.status_histogram(),
            js: summarize(AssetKind::Js),
            css: summarize(AssetKind::Css),
            img: summarize(AssetKind::Img),
        }
    }

    #[must_use]
    pub fn assets(&self, kind: AssetKind) -> &[AssetSummary] {
        match kind {
            AssetKind::Js => &self.js,
            AssetKind::Css => &self.css,
            AssetKind::Img => &self.img,
        }
    }

    /// Every asset summary, scripts first, then stylesheets, then images.
    pub fn all_assets(&self) -> impl Iterator<Item = &AssetSummary> {
        self.js.iter().chain(self.css.iter()).chain(self.img.iter())
    }
}
