//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod tests;

pub use cli::PerfArgs;
pub use types::{HeaderPair, OutputFormat, PositiveU64, PositiveUsize};

pub(crate) use defaults::{
    DEFAULT_CONFIG_FILES, DEFAULT_DURATION_SECS, DEFAULT_MAX_CONNECTIONS, DEFAULT_TIMEOUT,
    DEFAULT_USER_AGENT, DEFAULT_USERS,
};
pub(crate) use parsers::{parse_duration_value, parse_header};
