//! Output formatting for CLI commands
//!
//! Supports two output formats:
//! - Human-readable (default)
//! - JSON (for scripting and charting front ends)

use crate::aggregate::MonthCount;
use crate::pipeline::ActivityReport;
use crate::window::DateWindow;
use serde::Serialize;
use std::fmt::Write;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Human,
    Json,
}

/// Trait for types that can be output in multiple formats
pub trait Output: Serialize {
    /// Human-readable output
    fn human(&self) -> String;
}

/// Format a value according to the specified format
pub fn format<T: Output>(value: &T, format: Format) -> String {
    match format {
        Format::Human => value.human(),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
            json.push('\n');
            json
        }
    }
}

const BAR_WIDTH: usize = 40;

fn write_series(out: &mut String, title: &str, series: &[MonthCount]) {
    writeln!(out, "{}:", title).unwrap();
    if series.is_empty() {
        writeln!(out, "  (no activity)").unwrap();
        return;
    }

    let max = series.iter().map(|m| m.count).max().unwrap_or(0).max(1);
    for point in series {
        let bar = "#".repeat(point.count * BAR_WIDTH / max);
        writeln!(out, "  {} {:>6} {}", point.month, point.count, bar).unwrap();
    }
}

// ============================================================================
// Output types for each command
// ============================================================================

/// Output for `repo-pulse activity`
#[derive(Debug, Serialize)]
pub struct ActivityOutput {
    pub reports: Vec<ActivityReport>,
}

impl Output for ActivityOutput {
    fn human(&self) -> String {
        let mut out = String::new();
        for (i, report) in self.reports.iter().enumerate() {
            if i > 0 {
                writeln!(out).unwrap();
            }
            writeln!(
                out,
                "{} {} ({} months to {})",
                report.repository, report.kind, report.months, report.anchor
            )
            .unwrap();
            writeln!(out, "Stars: {}  Forks: {}", report.stars, report.forks).unwrap();
            write!(out, "Records: {}", report.records).unwrap();
            if report.dropped_records > 0 {
                write!(out, "  dropped: {}", report.dropped_records).unwrap();
            }
            if report.failed_pages > 0 {
                write!(out, "  failed pages: {}", report.failed_pages).unwrap();
            }
            writeln!(out).unwrap();
            writeln!(out).unwrap();

            write_series(&mut out, "Created", &report.created);
            if let Some(closed) = &report.closed {
                write_series(&mut out, "Closed", closed);
            }

            for (series, response) in &report.forecasts {
                writeln!(out, "Forecast ({}):", series).unwrap();
                for (key, value) in response {
                    let shown = match value.as_str() {
                        Some("") => "-".to_string(),
                        Some(s) => s.to_string(),
                        None => value.to_string(),
                    };
                    writeln!(out, "  {}: {}", key, shown).unwrap();
                }
            }
        }
        out
    }
}

/// Output for `repo-pulse windows`
#[derive(Debug, Serialize)]
pub struct WindowsOutput {
    pub windows: Vec<DateWindow>,
}

impl Output for WindowsOutput {
    fn human(&self) -> String {
        let mut out = String::new();
        for (i, window) in self.windows.iter().enumerate() {
            writeln!(out, "{:>3}  {} .. {}", i + 1, window.start, window.end).unwrap();
        }
        out
    }
}
