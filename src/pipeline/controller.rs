use serde::Serialize;
use thiserror::Error;

use crate::config::ViewProfile;
use crate::model::{Dataset, FilterGroup, Selection, SelectionError};
use crate::pipeline::filter::apply_selection;
use crate::pipeline::histogram::{Histogram, HistogramError, ScoreField, check_bin_count, histogram};
use crate::pipeline::table::{Field, Table, default_fields, table_rows};

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Histogram(#[from] HistogramError),
    #[error("filter group {group} uses column {column}, which the dataset does not carry")]
    UnknownAttribute { group: String, column: String },
    #[error("view worker for group {0} panicked")]
    Worker(String),
}

/// Fixed, per-group description of what a view shows.
#[derive(Debug, Clone)]
pub struct ViewSpec {
    pub title: String,
    pub group: FilterGroup,
    pub fields: Vec<Field>,
    pub field: ScoreField,
    pub bin_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub group_id: String,
    pub title: String,
    pub selection: Selection,
    pub histogram: Histogram,
    pub table: Table,
}

/// Filters, then derives the histogram and table. Pure over `dataset`.
pub fn derive_view(
    dataset: &Dataset,
    layout: &ViewSpec,
    selection: &Selection,
) -> Result<ViewSnapshot, ViewError> {
    layout.group.check(selection)?;
    let view = apply_selection(dataset, layout.group.attribute, selection)?;
    let histogram = histogram(&view, layout.field, layout.bin_count)?;
    let table = table_rows(&view, dataset.schema(), &layout.fields);
    tracing::debug!(
        group = %layout.group.id,
        selection = %selection,
        rows = table.len(),
        bins = histogram.bins.len(),
        "view derived"
    );
    Ok(ViewSnapshot {
        group_id: layout.group.id.clone(),
        title: layout.title.clone(),
        selection: selection.clone(),
        histogram,
        table,
    })
}

/// Current state of one filter group: its selection and last good view.
#[derive(Debug, Clone)]
pub struct ViewController {
    dataset: Dataset,
    layout: ViewSpec,
    selection: Selection,
    snapshot: ViewSnapshot,
}

impl ViewController {
    pub fn new(dataset: Dataset, layout: ViewSpec) -> Result<Self, ViewError> {
        check_bin_count(layout.bin_count)?;
        let selection = Selection::All;
        let snapshot = derive_view(&dataset, &layout, &selection)?;
        Ok(Self {
            dataset,
            layout,
            selection,
            snapshot,
        })
    }

    pub fn group(&self) -> &FilterGroup {
        &self.layout.group
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn snapshot(&self) -> &ViewSnapshot {
        &self.snapshot
    }

    /// Handles an inbound selection string. A rejected value leaves the
    /// previous selection and snapshot in place.
    pub fn selection_changed(&mut self, raw: &str) -> Result<&ViewSnapshot, ViewError> {
        match self.layout.group.parse_selection(raw) {
            Ok(selection) => self.select(selection),
            Err(err) => {
                tracing::warn!(group = %self.layout.group.id, value = raw, "selection rejected: {err}");
                Err(err.into())
            }
        }
    }

    pub fn select(&mut self, selection: Selection) -> Result<&ViewSnapshot, ViewError> {
        let snapshot = derive_view(&self.dataset, &self.layout, &selection)?;
        self.selection = selection;
        self.snapshot = snapshot;
        Ok(&self.snapshot)
    }

    pub fn recompute(&mut self) -> Result<(), ViewError> {
        self.snapshot = derive_view(&self.dataset, &self.layout, &self.selection)?;
        Ok(())
    }
}

/// One controller per configured filter group over a single shared dataset.
#[derive(Debug, Clone)]
pub struct ViewBoard {
    dataset: Dataset,
    controllers: Vec<ViewController>,
}

impl ViewBoard {
    pub fn from_profile(dataset: Dataset, profile: &ViewProfile) -> Result<Self, ViewError> {
        let schema = dataset.schema();
        let mut controllers = Vec::with_capacity(profile.groups.len());
        for group_spec in &profile.groups {
            let attribute =
                schema
                    .attribute(&group_spec.attribute)
                    .ok_or_else(|| ViewError::UnknownAttribute {
                        group: group_spec.id.clone(),
                        column: group_spec.attribute.clone(),
                    })?;
            let group = FilterGroup::derive(&group_spec.id, &group_spec.label, &dataset, attribute);
            tracing::info!(
                group = %group.id,
                attribute = %group.attribute_name,
                values = group.values().len(),
                "filter group derived"
            );
            let view = ViewSpec {
                title: format!("{} - {}", profile.title, group_spec.label),
                fields: default_fields(schema, attribute),
                field: ScoreField::Primary,
                bin_count: profile.bin_count,
                group,
            };
            controllers.push(ViewController::new(dataset.clone(), view)?);
        }
        Ok(Self {
            dataset,
            controllers,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn controllers(&self) -> &[ViewController] {
        &self.controllers
    }

    pub fn controller(&self, group_id: &str) -> Option<&ViewController> {
        self.controllers.iter().find(|c| c.group().id == group_id)
    }

    /// Routes a selection change to exactly one group.
    pub fn dispatch(&mut self, group_id: &str, raw: &str) -> Result<&ViewSnapshot, ViewError> {
        let Some(controller) = self
            .controllers
            .iter_mut()
            .find(|c| c.group().id == group_id)
        else {
            tracing::warn!(group = group_id, "selection for unknown filter group ignored");
            return Err(SelectionError::UnknownGroup(group_id.to_string()).into());
        };
        controller.selection_changed(raw)
    }

    /// Recomputes every group concurrently. The dataset is only read.
    pub fn recompute_all(&mut self) -> Result<(), ViewError> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .controllers
                .iter_mut()
                .map(|c| {
                    let id = c.group().id.clone();
                    (id, scope.spawn(move || c.recompute()))
                })
                .collect();
            for (id, handle) in handles {
                handle.join().map_err(|_| ViewError::Worker(id))??;
            }
            Ok(())
        })
    }

    pub fn snapshots(&self) -> Vec<&ViewSnapshot> {
        self.controllers.iter().map(|c| c.snapshot()).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/controller.rs"]
mod tests;
