//! Plain-text and JSON rendering of a sweep report

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{Result, SweepError};
use crate::sweep::SweepReport;

/// Summary header followed by one available domain per line (`None` when empty)
pub fn render_text(report: &SweepReport, source: &str, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Checked {} candidate domains from {}.\n",
        report.checked, source
    ));
    out.push_str(&format!("Found {} available domains.\n", report.available_count()));
    if !report.skipped.is_empty() {
        out.push_str(&format!("Skipped {} checks (timed out or failed).\n", report.skipped.len()));
    }
    out.push_str(&format!("Generated at {}\n\n", generated_at.format("%Y-%m-%d %H:%M:%S UTC")));

    if report.available.is_empty() {
        out.push_str("None\n");
    } else {
        for domain in &report.available {
            out.push_str(domain);
            out.push('\n');
        }
    }
    out
}

/// Write the text report to `path`, creating parent directories as needed
pub fn write_text(report: &SweepReport, path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            SweepError::io(e.to_string(), Some(parent.to_string_lossy().to_string()))
        })?;
    }

    let content = render_text(report, source, Utc::now());
    std::fs::write(path, content).map_err(|e| {
        SweepError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
    })?;

    tracing::info!(path = %path.display(), available = report.available_count(), "Report written");
    Ok(())
}

/// Pretty JSON rendering of the full report
pub fn to_json(report: &SweepReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
