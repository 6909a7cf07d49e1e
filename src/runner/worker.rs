use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::assets::AssetExtractor;
use crate::error::AppResult;
use crate::http::{FetchRequest, FetchResult, fetch, run_round};
use crate::metrics::{PageStats, WorkerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Running,
    Done,
}

/// One simulated user: repeats page rounds until its deadline passes.
pub struct IterationWorker {
    id: usize,
    client: Client,
    extractor: Arc<AssetExtractor>,
    request: FetchRequest,
    duration: Duration,
    warmup: bool,
    state: WorkerState,
}

impl IterationWorker {
    #[must_use]
    pub fn new(
        id: usize,
        client: Client,
        extractor: Arc<AssetExtractor>,
        request: FetchRequest,
        duration: Duration,
    ) -> Self {
        Self {
            id,
            client,
            extractor,
            request,
            duration,
            warmup: true,
            state: WorkerState::Idle,
        }
    }

    #[must_use]
    pub fn with_warmup(mut self, warmup: bool) -> Self {
        self.warmup = warmup;
        self
    }

    #[must_use]
    pub const fn state(&self) -> WorkerState {
        self.state
    }

    /// Request used for rounds, including any cookies captured during warm-up.
    #[must_use]
    pub const fn request(&self) -> &FetchRequest {
        &self.request
    }

    /// Runs rounds back to back until the configured duration has elapsed.
    ///
    /// The deadline is only checked after a round has been folded in, so at
    /// least one round always completes. The warm-up fetch is not counted.
    ///
    /// # Errors
    ///
    /// Returns an error when a round fails to resolve asset URLs or one of
    /// its fan-out tasks cannot be joined.
    pub async fn run(&mut self) -> AppResult<WorkerResult> {
        self.state = WorkerState::Running;
        debug!("Worker {} running for {:?}", self.id, self.duration);
        if self.warmup {
            self.warm_up().await;
        }

        let mut stats = PageStats::new(self.request.url.as_str());
        let start = Instant::now();
        loop {
            let round = match run_round(&self.client, &self.extractor, &self.request).await {
                Ok(round) => round,
                Err(err) => {
                    self.state = WorkerState::Done;
                    return Err(err);
                }
            };
            stats.record_round(&round);
            if start.elapsed() >= self.duration {
                break;
            }
        }

        self.state = WorkerState::Done;
        let result = WorkerResult::finalize(self.id, stats);
        debug!(
            "Worker {} done after {} rounds (avg round {:?})",
            self.id, result.stats.rounds, result.avg_round_time
        );
        Ok(result)
    }

    async fn warm_up(&mut self) {
        let response = fetch(&self.client, &self.request.with_capture_body(true)).await;
        if response.is_connection_error() {
            warn!(
                "Worker {} warm-up fetch failed: {}",
                self.id, response.error
            );
            return;
        }
        if let Some(cookies) = session_cookies(&response) {
            debug!("Worker {} captured session cookies", self.id);
            self.request = self.request.with_cookies(cookies);
        }
    }
}

/// `name=value` pairs of every `Set-Cookie` header, joined with `; `.
#[must_use]
pub fn session_cookies(response: &FetchResult) -> Option<String> {
    let values = response.header_values("set-cookie")?;
    let pairs: Vec<&str> = values
        .iter()
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect();
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}
