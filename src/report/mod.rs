use serde::Serialize;

use crate::model::DatasetSummary;
use crate::pipeline::controller::{ViewBoard, ViewSnapshot};
use crate::pipeline::histogram::Bin;
use crate::pipeline::table::Cell;

pub mod json;
pub mod text;
pub mod writer;

#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub id: String,
    pub label: String,
    pub attribute: String,
    pub values: Vec<String>,
    pub sentinel_collision: bool,
    pub selection: String,
    pub rows: usize,
    pub excluded_from_histogram: usize,
    pub bins: Vec<Bin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool_name: String,
    pub tool_version: String,
    pub dataset: DatasetSummary,
    pub groups: Vec<GroupSummary>,
}

pub fn build_summary(board: &ViewBoard) -> SummaryData {
    let groups = board
        .controllers()
        .iter()
        .map(|c| {
            let group = c.group();
            let snapshot = c.snapshot();
            GroupSummary {
                id: group.id.clone(),
                label: group.label.clone(),
                attribute: group.attribute_name.clone(),
                values: group.values().to_vec(),
                sentinel_collision: group.sentinel_collision(),
                selection: c.selection().to_string(),
                rows: snapshot.table.len(),
                excluded_from_histogram: snapshot.histogram.excluded,
                bins: snapshot.histogram.bins.clone(),
            }
        })
        .collect();
    SummaryData {
        tool_name: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        dataset: board.dataset().summary(),
        groups,
    }
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        Cell::Number(v) => format_f64_6(*v),
        Cell::Missing => String::new(),
    }
}

pub fn selection_label(snapshot: &ViewSnapshot) -> String {
    snapshot.selection.to_string()
}
