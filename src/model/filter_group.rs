use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::model::{AttributeId, Dataset};

/// Inbound token for "no restriction".
pub const ALL_TOKEN: &str = "all";
/// Alias for [`ALL_TOKEN`].
pub const ALL_ALIAS: &str = "*";
/// Prefix forcing a literal category value, e.g. `=all`.
pub const LITERAL_PREFIX: char = '=';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown filter group: {0}")]
    UnknownGroup(String),
    #[error("value {value:?} is not present in filter group {group}")]
    UnknownValue { group: String, value: String },
    #[error("value {value:?} does not occur in column {column}")]
    ValueNotInColumn { column: String, value: String },
    #[error("attribute index {0} is out of range for the dataset schema")]
    UnknownAttribute(usize),
    #[error(
        "filter group {group} has a category literally named {token:?}; select it as \"={token}\""
    )]
    AmbiguousSentinel { group: String, token: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Selection {
    All,
    Value(String),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL_TOKEN),
            Selection::Value(v) => f.write_str(v),
        }
    }
}

/// Distinct values of `attribute`, in first-occurrence order.
pub fn values_for(dataset: &Dataset, attribute: AttributeId) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for record in dataset.records() {
        let value = record.category(attribute);
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}

/// A named categorical dimension. Only constructible from a dataset, so the
/// value set always equals the data's distinct values.
#[derive(Debug, Clone, Serialize)]
pub struct FilterGroup {
    pub id: String,
    pub label: String,
    pub attribute: AttributeId,
    pub attribute_name: String,
    values: Vec<String>,
    /// Sentinel tokens (`all`, `*`) that are also category values.
    collisions: Vec<&'static str>,
}

impl FilterGroup {
    pub fn derive(
        id: impl Into<String>,
        label: impl Into<String>,
        dataset: &Dataset,
        attribute: AttributeId,
    ) -> Self {
        let id = id.into();
        let values = values_for(dataset, attribute);
        let collisions: Vec<&'static str> = [ALL_TOKEN, ALL_ALIAS]
            .into_iter()
            .filter(|token| values.iter().any(|v| v == token))
            .collect();
        for token in &collisions {
            tracing::warn!(
                group = %id,
                token,
                "category value collides with the all-sentinel; bare {token:?} selections will be rejected"
            );
        }
        Self {
            id,
            label: label.into(),
            attribute,
            attribute_name: dataset.schema().attribute_name(attribute).to_string(),
            values,
            collisions,
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn sentinel_collision(&self) -> bool {
        !self.collisions.is_empty()
    }

    /// Sentinel tokens that name real categories in this group.
    pub fn colliding_tokens(&self) -> &[&'static str] {
        &self.collisions
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Validates a [`Selection`] against the derived value set.
    pub fn check(&self, selection: &Selection) -> Result<(), SelectionError> {
        match selection {
            Selection::All => Ok(()),
            Selection::Value(v) if self.contains(v) => Ok(()),
            Selection::Value(v) => Err(SelectionError::UnknownValue {
                group: self.id.clone(),
                value: v.clone(),
            }),
        }
    }

    /// Maps a raw inbound string to a validated [`Selection`].
    pub fn parse_selection(&self, raw: &str) -> Result<Selection, SelectionError> {
        if self.collisions.iter().any(|token| *token == raw) {
            return Err(SelectionError::AmbiguousSentinel {
                group: self.id.clone(),
                token: raw.to_string(),
            });
        }
        let selection = if raw == ALL_TOKEN || raw == ALL_ALIAS {
            Selection::All
        } else if let Some(literal) = raw.strip_prefix(LITERAL_PREFIX) {
            Selection::Value(literal.to_string())
        } else {
            Selection::Value(raw.to_string())
        };
        self.check(&selection)?;
        Ok(selection)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/filter_group.rs"]
mod tests;
