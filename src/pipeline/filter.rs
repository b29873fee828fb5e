use crate::model::{AttributeId, Dataset, Record, Schema, Selection, SelectionError};

#[derive(Debug, Clone)]
enum ViewRows {
    All,
    Subset(Vec<usize>),
}

/// Records matching one [`Selection`], in dataset order. Borrows the dataset;
/// the `All` case holds no per-row state at all.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    selection: Selection,
    rows: ViewRows,
}

impl<'a> FilteredView<'a> {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn schema(&self) -> &'a Schema {
        self.dataset.schema()
    }

    pub fn len(&self) -> usize {
        match &self.rows {
            ViewRows::All => self.dataset.len(),
            ViewRows::Subset(idx) => idx.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &'a Record> + '_> {
        let records = self.dataset.records();
        match &self.rows {
            ViewRows::All => Box::new(records.iter()),
            ViewRows::Subset(idx) => Box::new(idx.iter().map(move |&i| &records[i])),
        }
    }
}

/// Applies `selection` on `attribute`. Pure; the dataset is only read.
///
/// A value outside [`crate::model::values_for`] is a caller error and is
/// reported instead of yielding an empty view.
pub fn apply_selection<'a>(
    dataset: &'a Dataset,
    attribute: AttributeId,
    selection: &Selection,
) -> Result<FilteredView<'a>, SelectionError> {
    let Some(column) = dataset.schema().categories.get(attribute.index()) else {
        return Err(SelectionError::UnknownAttribute(attribute.index()));
    };
    let rows = match selection {
        Selection::All => ViewRows::All,
        Selection::Value(value) => {
            let idx: Vec<usize> = dataset
                .records()
                .iter()
                .enumerate()
                .filter(|(_, r)| r.category(attribute) == value.as_str())
                .map(|(i, _)| i)
                .collect();
            // Every derived value has at least one row.
            if idx.is_empty() {
                return Err(SelectionError::ValueNotInColumn {
                    column: column.clone(),
                    value: value.clone(),
                });
            }
            ViewRows::Subset(idx)
        }
    };
    Ok(FilteredView {
        dataset,
        selection: selection.clone(),
        rows,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/filter.rs"]
mod tests;
