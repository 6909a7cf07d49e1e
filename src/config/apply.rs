use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PerfArgs, PositiveU64, PositiveUsize, parse_header};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Applies configuration file values to CLI arguments.
///
/// Values given on the command line or through the environment win over the
/// file.
///
/// # Errors
///
/// Returns an error when config values are invalid.
pub fn apply_config(
    args: &mut PerfArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_explicit(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_explicit(matches, "users")
        && let Some(users) = config.users
    {
        args.users = ensure_positive_usize(users, "users")?;
    }

    if !is_explicit(matches, "duration_secs")
        && let Some(duration) = config.duration
    {
        args.duration_secs = ensure_positive_u64(duration, "duration")?;
    }

    if !is_explicit(matches, "header")
        && let Some(header) = config.header.as_deref()
    {
        let parsed = parse_header(header)
            .map_err(|err| AppError::config(ConfigError::InvalidHeader { source: err }))?;
        args.header = Some(parsed);
    }

    if !is_explicit(matches, "cookies")
        && let Some(cookies) = config.cookies.clone()
    {
        args.cookies = cookies;
    }

    if !is_explicit(matches, "user_agent")
        && let Some(user_agent) = config.user_agent.clone()
    {
        args.user_agent = user_agent;
    }

    if !is_explicit(matches, "return_body")
        && let Some(return_body) = config.return_body
    {
        args.return_body = return_body;
    }

    if !is_explicit(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = timeout
            .to_duration()
            .map_err(|err| AppError::config(ConfigError::InvalidTimeout { source: err }))?;
    }

    if !is_explicit(matches, "max_connections")
        && let Some(max_connections) = config.max_connections
    {
        args.max_connections = ensure_positive_usize(max_connections, "max_connections")?;
    }

    if !is_explicit(matches, "parser")
        && let Some(parser) = config.parser
    {
        args.parser = parser;
    }

    if !is_explicit(matches, "no_warmup")
        && let Some(warmup) = config.warmup
    {
        args.no_warmup = !warmup;
    }

    if !is_explicit(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    if !is_explicit(matches, "output")
        && let Some(output) = config.output.clone()
    {
        args.output = Some(output);
    }

    if !is_explicit(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn ensure_positive_u64(value: u64, field: &'static str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value)
        .map_err(|err| AppError::config(ConfigError::FieldMustBePositive { field, source: err }))
}

fn ensure_positive_usize(value: usize, field: &'static str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value)
        .map_err(|err| AppError::config(ConfigError::FieldMustBePositive { field, source: err }))
}
