use crossterm::style::{Color, Stylize};

use crate::args::OutputFormat;
use crate::assets::AssetKind;
use crate::error::{AppError, AppResult, SinkError};

use super::format::{
    csv_field, format_millis, format_percent, format_statuses, html_escape, write_line,
};
use super::types::{AssetSummary, Report};

/// Turns a [`Report`] into bytes for one output format.
pub trait Renderer {
    /// # Errors
    ///
    /// Returns an error when the report cannot be serialized.
    fn render(&self, report: &Report) -> AppResult<Vec<u8>>;
}

#[must_use]
pub fn renderer_for(format: OutputFormat, color: bool) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer { color }),
        OutputFormat::Json => Box::new(JsonRenderer),
        OutputFormat::Csv => Box::new(CsvRenderer),
        OutputFormat::Html => Box::new(HtmlRenderer),
    }
}

/// Human-readable console summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer {
    pub color: bool,
}

impl TextRenderer {
    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().with(Color::Cyan).to_string()
        } else {
            text.to_owned()
        }
    }

    fn rate(&self, rate_x100: u64) -> String {
        let text = format_percent(rate_x100);
        if !self.color {
            return text;
        }
        if rate_x100 >= 10_000 {
            text.with(Color::Green).to_string()
        } else if rate_x100 >= 9_000 {
            text.with(Color::Yellow).to_string()
        } else {
            text.with(Color::Red).to_string()
        }
    }
}

impl Renderer for TextRenderer {
    fn render(&self, report: &Report) -> AppResult<Vec<u8>> {
        let mut output = String::new();
        write_line(&mut output, &self.heading("Page"))?;
        write_line(&mut output, &format!("  URL:                {}", report.base_url))?;
        write_line(
            &mut output,
            &format!(
                "  Users / rounds:     {} / {}",
                report.workers, report.rounds
            ),
        )?;
        write_line(
            &mut output,
            &format!(
                "  Requests:           {} page, {} total",
                report.requests, report.total_requests
            ),
        )?;
        write_line(&mut output, &format!("  Bytes:              {}", report.total_bytes))?;
        write_line(
            &mut output,
            &format!(
                "  Avg page response:  {}",
                format_millis(report.avg_page_response)
            ),
        )?;
        write_line(
            &mut output,
            &format!(
                "  Avg linear time:    {}",
                format_millis(report.avg_linear_response)
            ),
        )?;
        write_line(
            &mut output,
            &format!(
                "  Avg page fetch:     {}",
                format_millis(report.avg_time_to_first_byte)
            ),
        )?;
        write_line(
            &mut output,
            &format!("  Success rate:       {}", self.rate(report.success_rate_x100)),
        )?;
        write_line(
            &mut output,
            &format!("  Status:             {}", format_statuses(&report.status, " ")),
        )?;

        for kind in [AssetKind::Js, AssetKind::Css, AssetKind::Img] {
            let assets = report.assets(kind);
            write_line(&mut output, "")?;
            write_line(
                &mut output,
                &self.heading(&format!("{} ({})", kind.as_str().to_uppercase(), assets.len())),
            )?;
            if assets.is_empty() {
                write_line(&mut output, "  none")?;
            }
            for asset in assets {
                write_line(
                    &mut output,
                    &format!(
                        "  {:>6}  {:>12}  {:>8}  {}",
                        asset.count,
                        format_millis(asset.avg_latency),
                        self.rate(asset.success_rate_x100),
                        asset.url
                    ),
                )?;
            }
        }
        Ok(output.into_bytes())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, report: &Report) -> AppResult<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(report)
            .map_err(|err| AppError::sink(SinkError::SerializeReport { source: err }))?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// One row for the page and one per asset URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

const CSV_HEADER: &str = "kind,url,requests,bytes,avg_latency_us,success_rate,status";

impl Renderer for CsvRenderer {
    fn render(&self, report: &Report) -> AppResult<Vec<u8>> {
        let mut output = String::new();
        write_line(&mut output, CSV_HEADER)?;
        write_line(
            &mut output,
            &format!(
                "page,{},{},{},{},{},{}",
                csv_field(&report.base_url),
                report.requests,
                report.total_bytes,
                report.avg_time_to_first_byte.as_micros(),
                format_percent(report.success_rate_x100),
                format_statuses(&report.status, "|")
            ),
        )?;
        for asset in report.all_assets() {
            write_line(&mut output, &csv_row(asset))?;
        }
        Ok(output.into_bytes())
    }
}

fn csv_row(asset: &AssetSummary) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        asset.kind.as_str(),
        csv_field(&asset.url),
        asset.count,
        asset.bytes,
        asset.avg_latency.as_micros(),
        format_percent(asset.success_rate_x100),
        format_statuses(&asset.status, "|")
    )
}

/// Self-contained HTML page with one table per asset kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, report: &Report) -> AppResult<Vec<u8>> {
        let mut output = String::new();
        let title = html_escape(&report.base_url);
        write_line(&mut output, "<!DOCTYPE html>")?;
        write_line(&mut output, "<html><head><meta charset=\"utf-8\">")?;
        write_line(&mut output, &format!("<title>siteperf: {}</title>", title))?;
        write_line(
            &mut output,
            "<style>body{font-family:sans-serif}table{border-collapse:collapse}td,th{border:1px solid #ccc;padding:4px 8px;text-align:left}</style>",
        )?;
        write_line(&mut output, "</head><body>")?;
        write_line(&mut output, &format!("<h1>{}</h1>", title))?;
        write_line(&mut output, "<table>")?;
        for (label, value) in [
            ("Users", report.workers.to_string()),
            ("Rounds", report.rounds.to_string()),
            ("Page requests", report.requests.to_string()),
            ("Total requests", report.total_requests.to_string()),
            ("Total bytes", report.total_bytes.to_string()),
            ("Avg page response", format_millis(report.avg_page_response)),
            ("Avg linear time", format_millis(report.avg_linear_response)),
            ("Avg page fetch", format_millis(report.avg_time_to_first_byte)),
            ("Success rate", format_percent(report.success_rate_x100)),
            ("Status", format_statuses(&report.status, " ")),
        ] {
            write_line(
                &mut output,
                &format!("<tr><th>{}</th><td>{}</td></tr>", label, html_escape(&value)),
            )?;
        }
        write_line(&mut output, "</table>")?;

        for kind in [AssetKind::Js, AssetKind::Css, AssetKind::Img] {
            write_line(
                &mut output,
                &format!("<h2>{}</h2>", kind.as_str().to_uppercase()),
            )?;
            write_line(
                &mut output,
                "<table><tr><th>URL</th><th>Requests</th><th>Bytes</th><th>Avg latency</th><th>Success</th><th>Status</th></tr>",
            )?;
            for asset in report.assets(kind) {
                write_line(
                    &mut output,
                    &format!(
                        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                        html_escape(&asset.url),
                        asset.count,
                        asset.bytes,
                        format_millis(asset.avg_latency),
                        format_percent(asset.success_rate_x100),
                        html_escape(&format_statuses(&asset.status, " "))
                    ),
                )?;
            }
            write_line(&mut output, "</table>")?;
        }
        write_line(&mut output, "</body></html>")?;
        Ok(output.into_bytes())
    }
}
