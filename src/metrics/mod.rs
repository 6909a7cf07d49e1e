//! Per-URL accumulation and cross-worker merging.
mod accumulator;
mod duration;
mod types;


pub use accumulator::{AssetStatsMap, UrlStats};
pub use duration::{as_micros_u64, average_duration, serialize_micros, sum_durations};
pub use types::{CombinedResult, PageStats, WorkerResult};
