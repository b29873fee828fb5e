use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::pipeline::controller::{ViewBoard, ViewSnapshot};
use crate::report::json::render_summary_json;
use crate::report::text::render_view_text;
use crate::report::{SummaryData, build_summary, format_cell, format_f64_6};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tsv error: {0}")]
    Tsv(#[from] csv::Error),
}

/// Writes `summary.json`, `report.txt` and per-group histogram/table TSVs.
pub fn write_reports(board: &ViewBoard, out_dir: &Path) -> Result<SummaryData, ReportError> {
    fs::create_dir_all(out_dir)?;

    let summary = build_summary(board);
    write_text(&out_dir.join("summary.json"), &render_summary_json(&summary)?)?;

    let mut report = String::new();
    for snapshot in board.snapshots() {
        report.push_str(&render_view_text(snapshot, None));
        report.push('\n');
        write_histogram_tsv(
            snapshot,
            &out_dir.join(format!("{}_histogram.tsv", snapshot.group_id)),
        )?;
        write_table_tsv(
            snapshot,
            &out_dir.join(format!("{}_table.tsv", snapshot.group_id)),
        )?;
    }
    write_text(&out_dir.join("report.txt"), &report)?;

    tracing::info!(out = %out_dir.display(), groups = summary.groups.len(), "reports written");
    Ok(summary)
}

fn tsv_writer(path: &Path) -> Result<csv::Writer<File>, ReportError> {
    Ok(csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)?)
}

fn write_histogram_tsv(snapshot: &ViewSnapshot, path: &Path) -> Result<(), ReportError> {
    let mut w = tsv_writer(path)?;
    w.write_record(["lower", "upper", "count"])?;
    for bin in &snapshot.histogram.bins {
        w.write_record([
            format_f64_6(bin.lower),
            format_f64_6(bin.upper),
            bin.count.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

// Cells holding tabs, quotes or newlines are quoted.
fn write_table_tsv(snapshot: &ViewSnapshot, path: &Path) -> Result<(), ReportError> {
    let mut w = tsv_writer(path)?;
    w.write_record(&snapshot.table.columns)?;
    for row in &snapshot.table.rows {
        w.write_record(row.iter().map(format_cell))?;
    }
    w.flush()?;
    Ok(())
}

fn write_text(path: &Path, content: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(content.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/writer.rs"]
mod tests;
