use std::time::Duration;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("siteperf/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_USERS: usize = 1;
pub(crate) const DEFAULT_DURATION_SECS: u64 = 2;
pub(crate) const DEFAULT_MAX_CONNECTIONS: usize = 100;
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Config filenames checked in the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["siteperf.toml", "siteperf.json"];
