use std::time::Duration;

use crate::assets::AssetKind;
use crate::http::PageFetchResult;

use super::accumulator::{AssetStatsMap, UrlStats, merge_into, record_into};
use super::duration::average_duration;

/// Everything one or more workers observed for a target page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageStats {
    pub base: UrlStats,
    pub js: AssetStatsMap,
    pub css: AssetStatsMap,
    pub img: AssetStatsMap,
    pub rounds: u64,
    /// Sum of every round's wall time.
    pub round_time: Duration,
    /// Sum of every round's linear time.
    pub linear_time: Duration,
}

impl PageStats {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base: UrlStats::new(base_url),
            ..Self::default()
        }
    }

    /// Folds a completed round into the accumulators, creating per-URL
    /// entries on first sight.
    pub fn record_round(&mut self, round: &PageFetchResult) {
        self.base.record(&round.base);
        for result in &round.js {
            record_into(&mut self.js, result);
        }
        for result in &round.css {
            record_into(&mut self.css, result);
        }
        for result in &round.img {
            record_into(&mut self.img, result);
        }
        self.rounds = self.rounds.saturating_add(1);
        self.round_time = self.round_time.saturating_add(round.total_time);
        self.linear_time = self.linear_time.saturating_add(round.linear_time);
    }

    pub fn merge(&mut self, other: Self) {
        self.base.merge(other.base);
        merge_into(&mut self.js, other.js);
        merge_into(&mut self.css, other.css);
        merge_into(&mut self.img, other.img);
        self.rounds = self.rounds.saturating_add(other.rounds);
        self.round_time = self.round_time.saturating_add(other.round_time);
        self.linear_time = self.linear_time.saturating_add(other.linear_time);
    }

    #[must_use]
    pub const fn assets(&self, kind: AssetKind) -> &AssetStatsMap {
        match kind {
            AssetKind::Js => &self.js,
            AssetKind::Css => &self.css,
            AssetKind::Img => &self.img,
        }
    }

    #[must_use]
    pub fn avg_round_time(&self) -> Duration {
        average_duration(self.round_time, self.rounds)
    }

    #[must_use]
    pub fn avg_linear_time(&self) -> Duration {
        average_duration(self.linear_time, self.rounds)
    }

    /// Requests issued for the page and all assets.
    #[must_use]
    pub fn total_requests(&self) -> u64 {
        self.asset_maps()
            .flat_map(|map| map.values())
            .fold(self.base.requests(), |total, stats| {
                total.saturating_add(stats.requests())
            })
    }

    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.asset_maps()
            .flat_map(|map| map.values())
            .fold(self.base.bytes(), |total, stats| {
                total.saturating_add(stats.bytes())
            })
    }

    fn asset_maps(&self) -> impl Iterator<Item = &AssetStatsMap> {
        [&self.js, &self.css, &self.img].into_iter()
    }
}

/// Frozen output of one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerResult {
    pub worker_id: usize,
    pub stats: PageStats,
    pub avg_round_time: Duration,
    pub avg_linear_time: Duration,
}

impl WorkerResult {
    #[must_use]
    pub fn finalize(worker_id: usize, stats: PageStats) -> Self {
        Self {
            worker_id,
            avg_round_time: stats.avg_round_time(),
            avg_linear_time: stats.avg_linear_time(),
            stats,
        }
    }
}

/// All workers merged, with averages recomputed from the merged totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedResult {
    pub workers: usize,
    pub stats: PageStats,
    pub avg_round_time: Duration,
    pub avg_linear_time: Duration,
}

impl CombinedResult {
    /// Merges finished workers in the order given. The order changes only
    /// the sequence order inside each URL, never the totals.
    #[must_use]
    pub fn merge(base_url: &str, results: Vec<WorkerResult>) -> Self {
        let workers = results.len();
        let mut stats = PageStats::new(base_url);
        for result in results {
            stats.merge(result.stats);
        }
        Self {
            workers,
            avg_round_time: stats.avg_round_time(),
            avg_linear_time: stats.avg_linear_time(),
            stats,
        }
    }
}
