use std::fmt::Write;

use crate::model::FilterGroup;
use crate::pipeline::controller::ViewSnapshot;
use crate::pipeline::histogram::Histogram;
use crate::pipeline::table::Table;
use crate::report::{format_cell, format_f64_6, selection_label};

const BAR_WIDTH: usize = 40;

pub fn render_groups_text(groups: &[&FilterGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(
            out,
            "{} ({}): all, {}",
            group.id,
            group.attribute_name,
            group.values().join(", ")
        );
        for token in group.colliding_tokens() {
            let _ = writeln!(
                out,
                "  note: a category is literally named {token:?}; select it with \"={token}\""
            );
        }
    }
    out
}

/// Title, histogram bars and up to `max_rows` table rows.
pub fn render_view_text(snapshot: &ViewSnapshot, max_rows: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", snapshot.title);
    let _ = writeln!(
        out,
        "selection: {} ({} rows)",
        selection_label(snapshot),
        snapshot.table.len()
    );
    out.push('\n');
    render_histogram(&mut out, &snapshot.histogram);
    out.push('\n');
    render_table(&mut out, &snapshot.table, max_rows);
    out
}

fn render_histogram(out: &mut String, histogram: &Histogram) {
    if histogram.bins.is_empty() {
        let _ = writeln!(out, "(no scored records)");
    }
    let peak = histogram.bins.iter().map(|b| b.count).max().unwrap_or(0);
    let last = histogram.bins.len().saturating_sub(1);
    for (i, bin) in histogram.bins.iter().enumerate() {
        let bar = if peak == 0 {
            0
        } else {
            (bin.count * BAR_WIDTH).div_ceil(peak)
        };
        let close = if i == last { ']' } else { ')' };
        let _ = writeln!(
            out,
            "[{:>12}, {:>12}{} {:>6} {}",
            format_f64_6(bin.lower),
            format_f64_6(bin.upper),
            close,
            bin.count,
            "#".repeat(bar)
        );
    }
    if histogram.excluded > 0 {
        let _ = writeln!(out, "excluded (no score): {}", histogram.excluded);
    }
}

fn render_table(out: &mut String, table: &Table, max_rows: Option<usize>) {
    let limit = max_rows.unwrap_or(table.len()).min(table.len());
    let cells: Vec<Vec<String>> = table.rows[..limit]
        .iter()
        .map(|row| row.iter().map(format_cell).collect())
        .collect();

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    push_row(out, table.columns.iter().map(String::as_str), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(out, rule.iter().map(String::as_str), &widths);
    for row in &cells {
        push_row(out, row.iter().map(String::as_str), &widths);
    }
    if limit < table.len() {
        let _ = writeln!(out, "... {} more rows", table.len() - limit);
    }
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/text.rs"]
mod tests;
