use crate::pipeline::controller::ViewSnapshot;
use crate::report::SummaryData;

pub fn render_view_json(snapshot: &ViewSnapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}

pub fn render_views_json(snapshots: &[&ViewSnapshot]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshots)
}

pub fn render_summary_json(data: &SummaryData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}
