use super::{apply_config, load_config_file, types::ConfigFile, types::DurationValue};
use clap::{ArgMatches, CommandFactory, FromArgMatches};
use std::time::Duration;
use tempfile::tempdir;

use crate::args::{OutputFormat, PerfArgs};
use crate::assets::ExtractMode;

fn parse_cli(argv: &[&str]) -> Result<(PerfArgs, ArgMatches), String> {
    let matches = PerfArgs::command()
        .try_get_matches_from(argv)
        .map_err(|err| format!("parse failed: {}", err))?;
    let args =
        PerfArgs::from_arg_matches(&matches).map_err(|err| format!("from matches: {}", err))?;
    Ok((args, matches))
}

#[test]
fn parse_toml_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("siteperf.toml");
    let content = r#"
url = "http://localhost:3000/"
users = 4
duration = 15
header = "X-Env=staging"
cookies = "sid=abc"
timeout = "750ms"
parser = "regex"
warmup = false
output_format = "csv"
"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.url.as_deref() != Some("http://localhost:3000/") {
        return Err("Unexpected url".to_owned());
    }
    if config.users != Some(4) || config.duration != Some(15) {
        return Err("Unexpected users/duration".to_owned());
    }
    if config.parser != Some(ExtractMode::Pattern) {
        return Err("Expected regex parser".to_owned());
    }
    if config.output_format != Some(OutputFormat::Csv) {
        return Err("Expected csv output".to_owned());
    }
    let timeout = config
        .timeout
        .as_ref()
        .ok_or_else(|| "Expected timeout".to_owned())?
        .to_duration()
        .map_err(|err| err.to_string())?;
    if timeout != Duration::from_millis(750) {
        return Err(format!("Unexpected timeout: {:?}", timeout));
    }
    Ok(())
}

#[test]
fn parse_json_config_with_aliases() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("siteperf.json");
    let content = r#"{"url":"https://example.com/","concurrency":3,"sec":5,"timeout":10}"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.users != Some(3) || config.duration != Some(5) {
        return Err("Aliases not honored".to_owned());
    }
    match config.timeout {
        Some(DurationValue::Seconds(10)) => Ok(()),
        other => Err(format!("Unexpected timeout: {:?}", other)),
    }
}

#[test]
fn unsupported_extension_is_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("siteperf.yaml");
    std::fs::write(&path, "url: x").map_err(|err| format!("write failed: {}", err))?;
    if load_config_file(&path).is_ok() {
        return Err("Expected error for .yaml config".to_owned());
    }
    let bare = dir.path().join("siteperf");
    std::fs::write(&bare, "url = 'x'").map_err(|err| format!("write failed: {}", err))?;
    if load_config_file(&bare).is_ok() {
        return Err("Expected error for config without extension".to_owned());
    }
    Ok(())
}

#[test]
fn config_fills_values_not_given_on_cli() -> Result<(), String> {
    let (mut args, matches) = parse_cli(&["siteperf", "--users", "9"])?;
    let config = ConfigFile {
        url: Some("http://example.com/".to_owned()),
        users: Some(2),
        duration: Some(30),
        header: Some("X-From=config".to_owned()),
        warmup: Some(false),
        parser: Some(ExtractMode::Pattern),
        ..ConfigFile::default()
    };

    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.url.as_deref() != Some("http://example.com/") {
        return Err("Expected url from config".to_owned());
    }
    if args.users.get() != 9 {
        return Err("CLI users must win over config".to_owned());
    }
    if args.duration_secs.get() != 30 {
        return Err("Expected duration from config".to_owned());
    }
    let header = args.header.ok_or_else(|| "Expected header".to_owned())?;
    if header.name != "X-From" || header.value != "config" {
        return Err("Unexpected header from config".to_owned());
    }
    if !args.no_warmup {
        return Err("warmup = false should disable warm-up".to_owned());
    }
    if args.parser != ExtractMode::Pattern {
        return Err("Expected parser from config".to_owned());
    }
    Ok(())
}

#[test]
fn config_rejects_non_positive_values() -> Result<(), String> {
    let (mut args, matches) = parse_cli(&["siteperf"])?;
    let config = ConfigFile {
        users: Some(0),
        ..ConfigFile::default()
    };
    if apply_config(&mut args, &matches, &config).is_ok() {
        return Err("Expected error for users = 0".to_owned());
    }

    let config = ConfigFile {
        header: Some("no-delimiter".to_owned()),
        ..ConfigFile::default()
    };
    if apply_config(&mut args, &matches, &config).is_ok() {
        return Err("Expected error for malformed header".to_owned());
    }
    Ok(())
}
