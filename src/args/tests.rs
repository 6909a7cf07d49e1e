use super::parsers::{parse_bool_env, parse_duration_value};
use super::*;
use crate::assets::ExtractMode;
use crate::error::{AppError, AppResult};
use clap::Parser;
use std::time::Duration;

fn parse_test_args<I, T>(args: I) -> AppResult<PerfArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    PerfArgs::try_parse_from(args).map_err(AppError::from)
}

#[test]
fn parse_header_valid() -> AppResult<()> {
    let parsed = parse_header("X-Test=hello")?;
    if parsed.name != "X-Test" {
        return Err(AppError::validation(format!(
            "Unexpected name: {}",
            parsed.name
        )));
    }
    if parsed.value != "hello" {
        return Err(AppError::validation(format!(
            "Unexpected value: {}",
            parsed.value
        )));
    }
    Ok(())
}

#[test]
fn parse_header_keeps_equals_in_value() -> AppResult<()> {
    let parsed = parse_header("Authorization=Bearer a=b")?;
    if parsed.value != "Bearer a=b" {
        return Err(AppError::validation(format!(
            "Unexpected value: {}",
            parsed.value
        )));
    }
    Ok(())
}

#[test]
fn parse_header_invalid() -> AppResult<()> {
    if parse_header("MissingDelimiter").is_ok() {
        return Err(AppError::validation("Expected Err for missing '='"));
    }
    if parse_header("=value").is_ok() {
        return Err(AppError::validation("Expected Err for empty header name"));
    }
    Ok(())
}

#[test]
fn parse_bool_env_accepts_common_spellings() -> AppResult<()> {
    for value in ["1", "true", "YES", "on"] {
        if !parse_bool_env(value)? {
            return Err(AppError::validation(format!("Expected true for {}", value)));
        }
    }
    for value in ["0", "false", "No", "off"] {
        if parse_bool_env(value)? {
            return Err(AppError::validation(format!("Expected false for {}", value)));
        }
    }
    if parse_bool_env("maybe").is_ok() {
        return Err(AppError::validation("Expected Err for 'maybe'"));
    }
    Ok(())
}

#[test]
fn parse_duration_units() -> AppResult<()> {
    let cases = [
        ("250ms", Duration::from_millis(250)),
        ("5", Duration::from_secs(5)),
        ("5s", Duration::from_secs(5)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
    ];
    for (input, expected) in cases {
        let parsed = parse_duration_value(input)?;
        if parsed != expected {
            return Err(AppError::validation(format!(
                "{} parsed as {:?}, expected {:?}",
                input, parsed, expected
            )));
        }
    }
    Ok(())
}

#[test]
fn parse_duration_rejects_zero_and_garbage() -> AppResult<()> {
    for input in ["", "0s", "abc", "10d"] {
        if parse_duration_value(input).is_ok() {
            return Err(AppError::validation(format!(
                "Expected Err for '{}'",
                input
            )));
        }
    }
    Ok(())
}

#[test]
fn positive_numbers_reject_zero() -> AppResult<()> {
    if "0".parse::<PositiveUsize>().is_ok() {
        return Err(AppError::validation("Expected Err for usize 0"));
    }
    if PositiveU64::try_from(0).is_ok() {
        return Err(AppError::validation("Expected Err for u64 0"));
    }
    let value: PositiveU64 = "7".parse()?;
    if value.get() != 7 {
        return Err(AppError::validation("Expected 7"));
    }
    Ok(())
}

#[test]
fn cli_defaults() -> AppResult<()> {
    let args = parse_test_args(["siteperf", "--url", "http://localhost/"])?;
    if args.users.get() != DEFAULT_USERS {
        return Err(AppError::validation("Unexpected default users"));
    }
    if args.duration_secs.get() != DEFAULT_DURATION_SECS {
        return Err(AppError::validation("Unexpected default duration"));
    }
    if args.max_connections.get() != DEFAULT_MAX_CONNECTIONS {
        return Err(AppError::validation("Unexpected default max connections"));
    }
    if args.request_timeout != DEFAULT_TIMEOUT {
        return Err(AppError::validation("Unexpected default timeout"));
    }
    if args.user_agent != DEFAULT_USER_AGENT {
        return Err(AppError::validation("Unexpected default user agent"));
    }
    if args.parser != ExtractMode::Structural {
        return Err(AppError::validation("Expected dom parser by default"));
    }
    if args.output_format != OutputFormat::Text {
        return Err(AppError::validation("Expected text output by default"));
    }
    if args.return_body || args.no_warmup || args.fetch || args.fetch_all {
        return Err(AppError::validation("Unexpected flag enabled by default"));
    }
    Ok(())
}

#[test]
fn cli_parses_full_option_set() -> AppResult<()> {
    let args = parse_test_args([
        "siteperf",
        "-u",
        "https://example.com/",
        "-c",
        "8",
        "-s",
        "10",
        "-H",
        "X-Env=staging",
        "--cookies",
        "sid=abc",
        "--user-agent",
        "bench/1.0",
        "--timeout",
        "500ms",
        "--max-connections",
        "16",
        "--parser",
        "regex",
        "--no-warmup",
        "--return-body",
        "--output-format",
        "json",
        "--output",
        "report.json",
    ])?;
    if args.users.get() != 8 || args.duration_secs.get() != 10 {
        return Err(AppError::validation("Unexpected users/duration"));
    }
    let header = args
        .header
        .ok_or_else(|| AppError::validation("Expected header"))?;
    if header.name != "X-Env" || header.value != "staging" {
        return Err(AppError::validation("Unexpected header"));
    }
    if args.cookies != "sid=abc" || args.user_agent != "bench/1.0" {
        return Err(AppError::validation("Unexpected cookies/user agent"));
    }
    if args.request_timeout != Duration::from_millis(500) {
        return Err(AppError::validation("Unexpected timeout"));
    }
    if args.parser != ExtractMode::Pattern {
        return Err(AppError::validation("Expected regex parser"));
    }
    if !args.no_warmup || !args.return_body {
        return Err(AppError::validation("Expected warm-up off and body capture on"));
    }
    if args.output_format != OutputFormat::Json || args.output.as_deref() != Some("report.json") {
        return Err(AppError::validation("Unexpected output settings"));
    }
    Ok(())
}

#[test]
fn cli_rejects_zero_users() -> AppResult<()> {
    if parse_test_args(["siteperf", "-u", "http://localhost/", "-c", "0"]).is_ok() {
        return Err(AppError::validation("Expected Err for zero users"));
    }
    if parse_test_args(["siteperf", "-u", "http://localhost/", "-s", "0"]).is_ok() {
        return Err(AppError::validation("Expected Err for zero duration"));
    }
    Ok(())
}
