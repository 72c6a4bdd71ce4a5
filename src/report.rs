//! Reading and writing the JSON reports.
//!
//! The benchmark report is a single-element array,
//! `[{"benchmark": {"original_time_sec": .., "modified_time_sec": .., "speedup_ratio": ..}}]`,
//! and the float map is an array with one [`DowncastEntry`] per literal.
//! Both are pretty-printed with two-space indentation. Writing replaces the
//! whole file; earlier runs are never appended to.

use std::path::Path;

use tokio::fs;

use crate::error::{AppError, AppResult};
use crate::models::{BenchmarkRecord, BenchmarkResult, DowncastEntry};

/// Render the report body for `result`.
pub fn render_report(result: &BenchmarkResult) -> AppResult<String> {
    let records = [BenchmarkRecord::from(*result)];
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Write the report to `path`, truncating any existing content.
pub async fn write_report(path: &Path, result: &BenchmarkResult) -> AppResult<()> {
    let body = render_report(result)?;

    fs::write(path, body)
        .await
        .map_err(|e| AppError::io(path, e))?;

    tracing::debug!(path = %path.display(), "Report written");
    Ok(())
}

/// Render the float map; one entry per literal, in source order.
pub fn render_float_map(entries: &[DowncastEntry]) -> AppResult<String> {
    let mut body = serde_json::to_string_pretty(entries)?;
    body.push('\n');
    Ok(body)
}

/// Write the float map to `path`, truncating any existing content.
pub async fn write_float_map(path: &Path, entries: &[DowncastEntry]) -> AppResult<()> {
    let body = render_float_map(entries)?;

    fs::write(path, body)
        .await
        .map_err(|e| AppError::io(path, e))?;

    tracing::debug!(path = %path.display(), entries = entries.len(), "Float map written");
    Ok(())
}

/// Read a float map previously written by [`write_float_map`].
pub async fn read_float_map(path: &Path) -> AppResult<Vec<DowncastEntry>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Read a report previously written by [`write_report`].
pub async fn read_report(path: &Path) -> AppResult<Vec<BenchmarkRecord>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}
