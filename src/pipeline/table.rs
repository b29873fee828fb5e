use std::cmp::Ordering;

use serde::Serialize;
use thiserror::Error;

use crate::model::{AttributeId, Record, Schema};
use crate::pipeline::filter::FilteredView;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("invalid sort key {0:?} (use COLUMN[:asc|desc])")]
    InvalidSortKey(String),
}

/// A displayed column of the table projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Identifier,
    Category(AttributeId),
    Primary,
    Secondary(usize),
}

impl Field {
    pub fn resolve(schema: &Schema, column: &str) -> Result<Self, FieldError> {
        if column == schema.identifier {
            return Ok(Field::Identifier);
        }
        if column == schema.primary {
            return Ok(Field::Primary);
        }
        if let Some(attr) = schema.attribute(column) {
            return Ok(Field::Category(attr));
        }
        if let Some(idx) = schema.secondary_index(column) {
            return Ok(Field::Secondary(idx));
        }
        Err(FieldError::UnknownColumn(column.to_string()))
    }

    pub fn column_name(self, schema: &Schema) -> &str {
        match self {
            Field::Identifier => &schema.identifier,
            Field::Category(attr) => schema.attribute_name(attr),
            Field::Primary => &schema.primary,
            Field::Secondary(i) => &schema.secondary[i],
        }
    }

    fn cell(self, record: &Record) -> Cell {
        let number = |v: Option<f64>| v.map_or(Cell::Missing, Cell::Number);
        match self {
            Field::Identifier => Cell::Text(record.name.clone()),
            Field::Category(attr) => Cell::Text(record.category(attr).to_string()),
            Field::Primary => number(record.primary),
            Field::Secondary(i) => number(record.secondary.get(i).copied().flatten()),
        }
    }
}

/// Identifier, the group's attribute, primary, then every secondary score.
pub fn default_fields(schema: &Schema, attribute: AttributeId) -> Vec<Field> {
    let mut fields = vec![Field::Identifier, Field::Category(attribute), Field::Primary];
    fields.extend((0..schema.secondary.len()).map(Field::Secondary));
    fields
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    // Missing sorts after every value.
    fn compare(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Number(a), Cell::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (Cell::Missing, Cell::Missing) => Ordering::Equal,
            (Cell::Missing, _) => Ordering::Greater,
            (_, Cell::Missing) => Ordering::Less,
            (Cell::Number(_), Cell::Text(_)) => Ordering::Less,
            (Cell::Text(_), Cell::Number(_)) => Ordering::Greater,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// One owned row per record, in view order, cells in `fields` order.
pub fn table_rows(view: &FilteredView<'_>, schema: &Schema, fields: &[Field]) -> Table {
    let columns = fields
        .iter()
        .map(|f| f.column_name(schema).to_string())
        .collect();
    let rows = view
        .iter()
        .map(|record| fields.iter().map(|f| f.cell(record)).collect())
        .collect();
    Table { columns, rows }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

impl SortKey {
    /// Parses `COLUMN`, `COLUMN:asc` or `COLUMN:desc`.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let (column, descending) = match raw.rsplit_once(':') {
            Some((col, "asc")) => (col, false),
            Some((col, "desc")) => (col, true),
            Some(_) => return Err(FieldError::InvalidSortKey(raw.to_string())),
            None => (raw, false),
        };
        if column.is_empty() {
            return Err(FieldError::InvalidSortKey(raw.to_string()));
        }
        Ok(Self {
            column: column.to_string(),
            descending,
        })
    }
}

/// Stable multi-column sort for display. Earlier keys take precedence and
/// missing cells stay last in either direction.
pub fn sort_rows(table: &mut Table, keys: &[SortKey]) -> Result<(), FieldError> {
    let resolved = keys
        .iter()
        .map(|k| {
            table
                .column_index(&k.column)
                .map(|idx| (idx, k.descending))
                .ok_or_else(|| FieldError::UnknownColumn(k.column.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    table.rows.sort_by(|a, b| {
        for &(idx, descending) in &resolved {
            let (x, y) = (&a[idx], &b[idx]);
            let ord = x.compare(y);
            let either_missing = matches!(x, Cell::Missing) || matches!(y, Cell::Missing);
            let ord = if descending && !either_missing {
                ord.reverse()
            } else {
                ord
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/table.rs"]
mod tests;
