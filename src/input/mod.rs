use std::io::Read;
use std::path::Path;

use thiserror::Error;

pub mod reader;
pub mod scores;

use reader::open_maybe_gz;
use scores::{ScoreCell, parse_score};

use crate::config::ViewProfile;
use crate::model::{Dataset, Record, Schema};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing column: {0}")]
    MissingColumn(String),
    #[error("line {line}: column {column} has non-numeric value {value:?}")]
    InvalidScore {
        line: u64,
        column: String,
        value: String,
    },
    #[error("line {line}: record {name:?} has no primary score ({column})")]
    MissingPrimary {
        line: u64,
        name: String,
        column: String,
    },
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    identifier: usize,
    primary: usize,
    population: Option<usize>,
}

pub fn load_dataset(path: &Path, profile: &ViewProfile) -> Result<Dataset, LoadError> {
    tracing::info!(path = %path.display(), "loading dataset");
    let reader = open_maybe_gz(path)?;
    load_dataset_from_reader(reader, profile)
}

/// Reads a header-first, comma-delimited table and builds the [`Dataset`].
///
/// Rows outside the profile's population are skipped. Scores are parsed
/// here so nothing downstream sees untyped cells. Any failure aborts the
/// whole load.
pub fn load_dataset_from_reader<R: Read>(
    reader: R,
    profile: &ViewProfile,
) -> Result<Dataset, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let find = |name: &str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };

    let columns = ColumnIndex {
        identifier: find(&profile.identifier)?,
        primary: find(&profile.primary)?,
        population: match &profile.population {
            Some(p) => Some(find(&p.column)?),
            None => None,
        },
    };
    let category_names = profile.category_columns();
    let category_idx = category_names
        .iter()
        .map(|c| find(c))
        .collect::<Result<Vec<_>, _>>()?;
    let secondary_idx = profile
        .secondary
        .iter()
        .map(|c| find(c))
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::new();
    let mut skipped_population = 0usize;
    let mut quarantined = 0usize;

    for row in csv_reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        if let (Some(idx), Some(filter)) = (columns.population, &profile.population) {
            if cell(idx) != filter.value {
                skipped_population += 1;
                continue;
            }
        }

        let name = cell(columns.identifier).to_string();
        let primary = match parse_score(cell(columns.primary)) {
            ScoreCell::Value(v) => Some(v),
            ScoreCell::Missing if profile.allow_missing_primary => {
                quarantined += 1;
                tracing::debug!(line, name = %name, "primary score missing; row quarantined");
                None
            }
            ScoreCell::Missing => {
                return Err(LoadError::MissingPrimary {
                    line,
                    name,
                    column: profile.primary.clone(),
                });
            }
            ScoreCell::Invalid => {
                return Err(invalid_score(line, &profile.primary, cell(columns.primary)));
            }
        };

        let mut secondary = Vec::with_capacity(secondary_idx.len());
        for (pos, &idx) in secondary_idx.iter().enumerate() {
            match parse_score(cell(idx)) {
                ScoreCell::Value(v) => secondary.push(Some(v)),
                ScoreCell::Missing => secondary.push(None),
                ScoreCell::Invalid => {
                    return Err(invalid_score(line, &profile.secondary[pos], cell(idx)));
                }
            }
        }

        records.push(Record {
            name,
            categories: category_idx.iter().map(|&i| cell(i).to_string()).collect(),
            primary,
            secondary,
        });
    }

    if quarantined > 0 {
        tracing::warn!(
            count = quarantined,
            column = %profile.primary,
            "records without a primary score kept in tables and excluded from histograms"
        );
    }
    tracing::info!(
        records = records.len(),
        skipped_population,
        "dataset loaded"
    );

    let schema = Schema {
        identifier: profile.identifier.clone(),
        categories: category_names,
        primary: profile.primary.clone(),
        secondary: profile.secondary.clone(),
    };
    Ok(Dataset::new(schema, records))
}

fn invalid_score(line: u64, column: &str, value: &str) -> LoadError {
    LoadError::InvalidScore {
        line,
        column: column.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
