//! Instrumented fetching: single requests, asset fan-out and full page rounds.
mod client;
mod fanout;
mod fetch;
mod resolve;
mod round;


pub use client::{ClientSettings, build_client};
pub use fanout::{FanoutResult, fetch_all};
pub use fetch::{CONNECTION_ERROR_STATUS, FetchRequest, FetchResult, ResponseHeaders, fetch};
pub use resolve::{page_origin, resolve_asset_url, validate_target_url};
pub use round::{PageFetchResult, run_round};
