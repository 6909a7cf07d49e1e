use std::collections::BTreeMap;
use std::time::Duration;

use crate::http::FetchResult;

use super::duration::{average_duration, sum_durations};

/// Running observations for one URL.
///
/// `statuses`, `durations` and `requests` always grow together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlStats {
    url: String,
    statuses: Vec<i32>,
    durations: Vec<Duration>,
    requests: u64,
    bytes: u64,
}

impl UrlStats {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Folds one fetch in. Connection failures count as a request but add no bytes.
    pub fn record(&mut self, result: &FetchResult) {
        self.statuses.push(result.status);
        self.durations.push(result.elapsed);
        self.requests = self.requests.saturating_add(1);
        if !result.is_connection_error() {
            self.bytes = self.bytes.saturating_add(result.bytes);
        }
    }

    /// Appends another accumulator's observations after this one's.
    pub fn merge(&mut self, other: Self) {
        if self.url.is_empty() {
            self.url = other.url;
        }
        self.statuses.extend(other.statuses);
        self.durations.extend(other.durations);
        self.requests = self.requests.saturating_add(other.requests);
        self.bytes = self.bytes.saturating_add(other.bytes);
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn statuses(&self) -> &[i32] {
        &self.statuses
    }

    #[must_use]
    pub fn durations(&self) -> &[Duration] {
        &self.durations
    }

    #[must_use]
    pub const fn requests(&self) -> u64 {
        self.requests
    }

    #[must_use]
    pub const fn bytes(&self) -> u64 {
        self.bytes
    }

    #[must_use]
    pub fn total_duration(&self) -> Duration {
        sum_durations(&self.durations)
    }

    /// Zero when nothing was recorded; check [`Self::requests`] to tell the cases apart.
    #[must_use]
    pub fn average_duration(&self) -> Duration {
        average_duration(self.total_duration(), self.requests)
    }

    /// Count per distinct status, keyed by its decimal text.
    #[must_use]
    pub fn status_histogram(&self) -> BTreeMap<String, u64> {
        let mut histogram = BTreeMap::new();
        for status in &self.statuses {
            let count = histogram.entry(status.to_string()).or_insert(0u64);
            *count = count.saturating_add(1);
        }
        histogram
    }

    /// Responses with a 2xx or 3xx status.
    #[must_use]
    pub fn successes(&self) -> u64 {
        let count = self
            .statuses
            .iter()
            .filter(|status| (200..=399).contains(*status))
            .count();
        u64::try_from(count).unwrap_or(u64::MAX)
    }

    /// Success rate in hundredths of a percent (10000 = 100%).
    #[must_use]
    pub fn success_rate_x100(&self) -> u64 {
        if self.requests == 0 {
            return 0;
        }
        self.successes()
            .saturating_mul(10_000)
            .checked_div(self.requests)
            .unwrap_or(0)
    }
}

/// Per-URL accumulators for one asset kind.
pub type AssetStatsMap = BTreeMap<String, UrlStats>;

pub(crate) fn record_into(map: &mut AssetStatsMap, result: &FetchResult) {
    map.entry(result.url.clone())
        .or_insert_with(|| UrlStats::new(result.url.as_str()))
        .record(result);
}

pub(crate) fn merge_into(target: &mut AssetStatsMap, source: AssetStatsMap) {
    for (url, stats) in source {
        match target.get_mut(&url) {
            Some(existing) => existing.merge(stats),
            None => {
                target.insert(url, stats);
            }
        }
    }
}
