use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::Serialize;
use tabled::Table;
use tabled::settings::object::Segment;
use tabled::settings::style::HorizontalLine;
use tabled::settings::{Alignment, Modify, Style, Width};
use thiserror::Error;

use crate::config::Target;
use crate::snapshot::{Report, ReportRow};

pub const MAX_CELL_WIDTH: usize = 20;
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Bordered text table (default)
    #[default]
    Table,
    /// JSON document
    Json,
    /// YAML document
    Yaml,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode report as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode report as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Machine-readable form of one snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotDocument<'a> {
    timestamp: String,
    /// Absent when every namespace was listed.
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
    rows: &'a [ReportRow],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    unmatched_metrics: &'a [String],
}

pub fn timestamp_line(taken_at: &DateTime<Local>) -> String {
    format!("Timestamp : {}", taken_at.format(TIMESTAMP_FORMAT))
}

/// ASCII grid with a `=` rule under the header, every cell wrapped at
/// [`MAX_CELL_WIDTH`] and centered.
pub fn render_table(rows: &[ReportRow]) -> String {
    let header_rule = HorizontalLine::full('=', '+', '+', '+');
    let mut table = Table::new(rows);
    table
        .with(Style::ascii().horizontals([(1, header_rule)]))
        .with(Modify::new(Segment::all()).with(Width::wrap(MAX_CELL_WIDTH)))
        .with(Modify::new(Segment::all()).with(Alignment::center()));
    table.to_string()
}

pub fn render(
    report: &Report,
    target: &Target,
    taken_at: &DateTime<Local>,
    format: OutputFormat,
) -> Result<String, RenderError> {
    let rendered = match format {
        OutputFormat::Table => {
            let body = if report.rows.is_empty() {
                "No pods found.".to_string()
            } else {
                render_table(&report.rows)
            };
            format!("{}\n{body}", timestamp_line(taken_at))
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            let document = SnapshotDocument {
                timestamp: taken_at.format(TIMESTAMP_FORMAT).to_string(),
                namespace: match target {
                    Target::Namespace(ns) => Some(ns.as_str()),
                    Target::AllNamespaces => None,
                },
                rows: &report.rows,
                unmatched_metrics: &report.unmatched_metrics,
            };
            if format == OutputFormat::Json {
                serde_json::to_string_pretty(&document)?
            } else {
                serde_yaml::to_string(&document)?
            }
        }
    };
    Ok(rendered)
}
