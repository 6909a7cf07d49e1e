use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use crate::error::{AppError, AppResult, SinkError};
use crate::metrics::as_micros_u64;

pub(super) fn write_line(output: &mut String, line: &str) -> AppResult<()> {
    writeln!(output, "{}", line).map_err(|err| AppError::sink(SinkError::WriteLine { source: err }))
}

pub(super) fn format_x100(value: u64) -> String {
    format!("{}.{:02}", value / 100, value % 100)
}

/// Milliseconds with two decimals, e.g. `12.34 ms`.
pub(super) fn format_millis(duration: Duration) -> String {
    format!("{} ms", format_x100(as_micros_u64(duration) / 10))
}

pub(super) fn format_percent(rate_x100: u64) -> String {
    format!("{}%", format_x100(rate_x100))
}

/// `200:3 404:1` style status summary.
pub(super) fn format_statuses(status: &BTreeMap<String, u64>, separator: &str) -> String {
    status
        .iter()
        .map(|(code, count)| format!("{}:{}", code, count))
        .collect::<Vec<_>>()
        .join(separator)
}

pub(super) fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

pub(super) fn html_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
