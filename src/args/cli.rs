use clap::Parser;
use std::time::Duration;

use crate::assets::ExtractMode;

use super::parsers::{
    parse_bool_env, parse_duration_arg, parse_header, parse_positive_u64, parse_positive_usize,
};
use super::types::{HeaderPair, OutputFormat, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Concurrent page load tester - fetches a page and every script, stylesheet and image it references for a number of simulated users, then reports per-asset latency and status statistics."
)]
pub struct PerfArgs {
    /// Target page URL
    #[arg(long, short, env = "SITEPERF_URL", help_heading = "Common Options")]
    pub url: Option<String>,

    /// Number of concurrent simulated users
    #[arg(
        long = "users",
        short = 'c',
        aliases = ["concurrency"],
        env = "SITEPERF_USERS",
        default_value = "1",
        value_parser = parse_positive_usize,
        help_heading = "Common Options"
    )]
    pub users: PositiveUsize,

    /// Duration of the test (seconds)
    #[arg(
        long = "sec",
        short = 's',
        aliases = ["duration"],
        env = "SITEPERF_DURATION",
        default_value = "2",
        value_parser = parse_positive_u64,
        help_heading = "Common Options"
    )]
    pub duration_secs: PositiveU64,

    /// Extra request header in 'key=value' format
    #[arg(long, short = 'H', env = "SITEPERF_HEADER", value_parser = parse_header)]
    pub header: Option<HeaderPair>,

    /// Cookie string sent with every request
    #[arg(long, env = "SITEPERF_COOKIES", default_value = "")]
    pub cookies: String,

    /// User-Agent header value
    #[arg(
        long = "user-agent",
        aliases = ["useragent"],
        env = "SITEPERF_USER_AGENT",
        default_value = super::defaults::DEFAULT_USER_AGENT
    )]
    pub user_agent: String,

    /// Keep response bodies and headers on fetch results
    #[arg(long = "return-body")]
    pub return_body: bool,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        env = "SITEPERF_TIMEOUT",
        default_value = "30s",
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Maximum idle connections kept per host
    #[arg(
        long = "max-connections",
        env = "SITEPERF_MAX_CONNECTIONS",
        default_value = "100",
        value_parser = parse_positive_usize
    )]
    pub max_connections: PositiveUsize,

    /// Asset extraction strategy
    #[arg(long = "parser", env = "SITEPERF_PARSER", default_value = "dom", value_enum)]
    pub parser: ExtractMode,

    /// Skip the per-user warm-up fetch that captures session cookies
    #[arg(long = "no-warmup")]
    pub no_warmup: bool,

    /// Report format
    #[arg(long = "output-format", default_value = "text", value_enum)]
    pub output_format: OutputFormat,

    /// Write the report to this path instead of stdout
    #[arg(long, short)]
    pub output: Option<String>,

    /// Fetch the URL once and print the instrumented result
    #[arg(long = "fetch")]
    pub fetch: bool,

    /// Fetch the URL and all of its assets once and print the result
    #[arg(long = "fetch-all", aliases = ["fetchall"])]
    pub fetch_all: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by SITEPERF_LOG/RUST_LOG)
    #[arg(long, short = 'v', help_heading = "Common Options")]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,

    /// Path to config file (TOML/JSON). Defaults to ./siteperf.toml or ./siteperf.json if present.
    #[arg(long, help_heading = "Common Options")]
    pub config: Option<String>,
}
