//! Core library for the `siteperf` CLI.
//!
//! `siteperf` loads a page the way a browser would, fetching every script,
//! stylesheet and image it references, for a number of concurrent simulated
//! users over a fixed duration. Per-URL latency, size and status statistics
//! are merged across users into a single report.
//!
//! The pipeline is [`http::fetch`] for a single instrumented request,
//! [`assets::AssetExtractor`] for discovery, [`http::run_round`] for one page
//! plus its assets, [`runner::IterationWorker`] for one user, and
//! [`runner::Aggregator`] for the whole run.
pub mod args;
pub mod assets;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod report;
pub mod runner;

#[cfg(test)]
mod test_support;
