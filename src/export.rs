use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

/// Write a full table as CSV: header row, one record per row, no index
/// column. The target is overwritten unconditionally.
pub fn write_csv(path: &Path, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    writer.write_record(headers).context("write csv header")?;
    for row in rows {
        writer.write_record(row).context("write csv row")?;
    }
    writer.flush().context("flush csv")?;
    info!("data saved to {}", path.display());
    Ok(())
}

/// Write a bounded-length YAML list of snapshot rows. `limit: None` keeps
/// every row. The target is overwritten unconditionally.
pub fn write_yaml<T: Serialize>(path: &Path, rows: &[T], limit: Option<usize>) -> Result<()> {
    ensure_parent(path)?;
    let trimmed = match limit {
        Some(count) => &rows[..rows.len().min(count)],
        None => rows,
    };
    let file = fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_yaml::to_writer(file, trimmed).context("write yaml snapshot")?;
    info!("data saved to {} ({} rows)", path.display(), trimmed.len());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).with_context(|| format!("create directory {}", dir.display()))?;
        }
    }
    Ok(())
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Snapshot rendering for numeric cells, rounded to 3 decimals.
pub fn fmt_f64(value: f64) -> String {
    round3(value).to_string()
}

/// Missing values render as empty cells, not as a literal "NaN".
pub fn fmt_opt(value: Option<f64>) -> String {
    value.map(fmt_f64).unwrap_or_default()
}
