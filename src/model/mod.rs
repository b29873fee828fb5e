use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;

pub mod filter_group;

pub use filter_group::{FilterGroup, Selection, SelectionError, values_for};

/// Index of a categorical attribute within a [`Schema`]. Obtained from
/// [`Schema::attribute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AttributeId(pub(crate) usize);

impl AttributeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Column layout of a loaded dataset. Resolved once at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub identifier: String,
    pub categories: Vec<String>,
    pub primary: String,
    pub secondary: Vec<String>,
}

impl Schema {
    pub fn attribute(&self, column: &str) -> Option<AttributeId> {
        self.categories
            .iter()
            .position(|c| c == column)
            .map(AttributeId)
    }

    pub fn attribute_name(&self, attribute: AttributeId) -> &str {
        &self.categories[attribute.0]
    }

    pub fn secondary_index(&self, column: &str) -> Option<usize> {
        self.secondary.iter().position(|c| c == column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    /// One value per [`Schema::categories`] entry.
    pub categories: Vec<String>,
    /// `None` only for rows quarantined at load time.
    pub primary: Option<f64>,
    pub secondary: Vec<Option<f64>>,
}

impl Record {
    pub fn category(&self, attribute: AttributeId) -> &str {
        &self.categories[attribute.0]
    }
}

/// Immutable, shared universe every view filters from.
///
/// Records are ordered by primary score, descending, once in [`Dataset::new`];
/// that order is the default order of every derived table. Clones share the
/// same allocation and nothing hands out mutable access.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Arc<Schema>,
    records: Arc<[Record]>,
}

impl Dataset {
    pub fn new(schema: Schema, mut records: Vec<Record>) -> Self {
        records.sort_by(|a, b| compare_primary_desc(a.primary, b.primary));
        Self {
            schema: Arc::new(schema),
            records: records.into(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> DatasetSummary {
        let mut total = 0.0f64;
        let mut scored = 0usize;
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        for v in self.records.iter().filter_map(|r| r.primary) {
            total += v;
            scored += 1;
            min = Some(min.map_or(v, |m| m.min(v)));
            max = Some(max.map_or(v, |m| m.max(v)));
        }
        DatasetSummary {
            n_records: self.records.len(),
            n_missing_primary: self.records.len() - scored,
            primary_total: total,
            primary_min: min,
            primary_max: max,
        }
    }
}

// Descending by score; missing scores go last; ties keep load order.
fn compare_primary_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub n_records: usize,
    pub n_missing_primary: usize,
    /// Sum of the primary score over every scored record.
    pub primary_total: f64,
    pub primary_min: Option<f64>,
    pub primary_max: Option<f64>,
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/dataset.rs"]
mod tests;
