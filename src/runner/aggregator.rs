use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::info;

use crate::args::{
    DEFAULT_DURATION_SECS, DEFAULT_MAX_CONNECTIONS, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
    DEFAULT_USERS, HeaderPair, PerfArgs,
};
use crate::assets::{AssetExtractor, ExtractMode};
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::{
    ClientSettings, FetchRequest, FetchResult, PageFetchResult, build_client, fetch, run_round,
    validate_target_url,
};
use crate::metrics::{CombinedResult, WorkerResult};

use super::worker::IterationWorker;

/// Everything a run needs, handed to the [`Aggregator`] up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub url: String,
    pub users: usize,
    pub duration: Duration,
    pub header: Option<HeaderPair>,
    pub cookies: String,
    pub user_agent: String,
    pub capture_body: bool,
    pub request_timeout: Duration,
    pub max_connections: usize,
    pub extract_mode: ExtractMode,
    pub warmup: bool,
}

impl RunSettings {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            users: DEFAULT_USERS,
            duration: Duration::from_secs(DEFAULT_DURATION_SECS),
            header: None,
            cookies: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            capture_body: false,
            request_timeout: DEFAULT_TIMEOUT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            extract_mode: ExtractMode::default(),
            warmup: true,
        }
    }

    /// Builds settings from resolved CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns an error when no URL was supplied.
    pub fn from_args(args: &PerfArgs) -> AppResult<Self> {
        let Some(url) = args.url.clone() else {
            return Err(AppError::validation(ValidationError::MissingUrl));
        };
        Ok(Self {
            url,
            users: args.users.get(),
            duration: Duration::from_secs(args.duration_secs.get()),
            header: args.header.clone(),
            cookies: args.cookies.clone(),
            user_agent: args.user_agent.clone(),
            capture_body: args.return_body,
            request_timeout: args.request_timeout,
            max_connections: args.max_connections.get(),
            extract_mode: args.parser,
            warmup: !args.no_warmup,
        })
    }

    /// Rejects settings that could not produce any useful data.
    ///
    /// # Errors
    ///
    /// Returns an error for an unusable URL, zero users or a zero duration.
    pub fn validate(&self) -> AppResult<()> {
        validate_target_url(&self.url)?;
        if self.users == 0 {
            return Err(AppError::validation(ValidationError::ConcurrencyZero));
        }
        if self.duration.is_zero() {
            return Err(AppError::validation(ValidationError::DurationZero));
        }
        if self.max_connections == 0 {
            return Err(AppError::validation(ValidationError::ValueTooSmall { min: 1 }));
        }
        Ok(())
    }

    /// Request template every worker starts from.
    #[must_use]
    pub fn base_request(&self) -> FetchRequest {
        FetchRequest {
            url: self.url.clone(),
            capture_body: self.capture_body,
            cookies: self.cookies.clone(),
            header: self.header.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Runs one worker per simulated user and merges what they observed.
pub struct Aggregator {
    settings: RunSettings,
    client: Client,
    extractor: Arc<AssetExtractor>,
}

impl Aggregator {
    /// Validates the settings and prepares the shared client and extractor.
    ///
    /// # Errors
    ///
    /// Returns an error when the settings are invalid or the client or
    /// extractor cannot be built. Nothing has been spawned at that point.
    pub fn new(settings: RunSettings) -> AppResult<Self> {
        settings.validate()?;
        let client = build_client(ClientSettings {
            request_timeout: settings.request_timeout,
            max_connections: settings.max_connections,
        })?;
        let extractor = Arc::new(AssetExtractor::new(settings.extract_mode)?);
        Ok(Self {
            settings,
            client,
            extractor,
        })
    }

    #[must_use]
    pub const fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Spawns every worker, waits for all of them, then merges their results.
    ///
    /// # Errors
    ///
    /// Returns the first worker error, after every worker has finished.
    pub async fn run(&self) -> AppResult<CombinedResult> {
        let settings = &self.settings;
        info!(
            "Starting {} user(s) against {} for {:?}",
            settings.users, settings.url, settings.duration
        );

        let handles: Vec<_> = (0..settings.users)
            .map(|worker_id| {
                let mut worker = IterationWorker::new(
                    worker_id,
                    self.client.clone(),
                    Arc::clone(&self.extractor),
                    settings.base_request(),
                    settings.duration,
                )
                .with_warmup(settings.warmup);
                tokio::spawn(async move { worker.run().await })
            })
            .collect();

        let mut slots: Vec<AppResult<WorkerResult>> = Vec::with_capacity(handles.len());
        for handle in handles {
            slots.push(handle.await.map_err(AppError::from).and_then(|result| result));
        }
        let results = slots.into_iter().collect::<AppResult<Vec<_>>>()?;

        let combined = CombinedResult::merge(&settings.url, results);
        info!(
            "Finished: {} rounds, {} requests, {} bytes",
            combined.stats.rounds,
            combined.stats.total_requests(),
            combined.stats.total_bytes()
        );
        Ok(combined)
    }

    /// One instrumented fetch of the target page.
    pub async fn fetch_once(&self) -> FetchResult {
        fetch(&self.client, &self.settings.base_request()).await
    }

    /// One full round of the target page and its assets.
    ///
    /// # Errors
    ///
    /// Returns an error when an asset reference cannot be resolved or a
    /// fan-out task cannot be joined.
    pub async fn fetch_round(&self) -> AppResult<PageFetchResult> {
        run_round(&self.client, &self.extractor, &self.settings.base_request()).await
    }
}
