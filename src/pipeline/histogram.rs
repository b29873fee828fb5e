use serde::Serialize;
use thiserror::Error;

use crate::model::Record;
use crate::pipeline::filter::FilteredView;

pub const DEFAULT_BIN_COUNT: usize = 10;
pub const MAX_BIN_COUNT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistogramError {
    #[error("bin count must be in 1..={max}, got {got}")]
    InvalidBinCount { got: usize, max: usize },
    #[error("secondary score index {0} is out of range")]
    UnknownField(usize),
}

/// Numeric field a histogram is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    Primary,
    Secondary(usize),
}

impl ScoreField {
    pub fn value(self, record: &Record) -> Option<f64> {
        match self {
            ScoreField::Primary => record.primary,
            ScoreField::Secondary(i) => record.secondary.get(i).copied().flatten(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub field: ScoreField,
    pub bins: Vec<Bin>,
    /// Records counted in `bins`.
    pub total: usize,
    /// Records in the view without a usable score.
    pub excluded: usize,
}

pub fn check_bin_count(bin_count: usize) -> Result<(), HistogramError> {
    if bin_count == 0 || bin_count > MAX_BIN_COUNT {
        return Err(HistogramError::InvalidBinCount {
            got: bin_count,
            max: MAX_BIN_COUNT,
        });
    }
    Ok(())
}

/// Equal-width histogram of `field` over the view's observed range.
///
/// Bins are half-open `[lower, upper)` except the last, which also holds
/// `max`. A single distinct value collapses to one bin `[v, v]`; an empty
/// view gives no bins.
pub fn histogram(
    view: &FilteredView<'_>,
    field: ScoreField,
    bin_count: usize,
) -> Result<Histogram, HistogramError> {
    check_bin_count(bin_count)?;

    if let ScoreField::Secondary(i) = field {
        if i >= view.schema().secondary.len() {
            return Err(HistogramError::UnknownField(i));
        }
    }

    let mut values = Vec::with_capacity(view.len());
    let mut excluded = 0usize;
    for record in view.iter() {
        match field.value(record) {
            Some(v) if v.is_finite() => values.push(v),
            _ => excluded += 1,
        }
    }
    if excluded > 0 {
        tracing::warn!(
            excluded,
            selection = %view.selection(),
            "records without a score left out of histogram"
        );
    }

    let bins = bin_values(&values, bin_count);
    Ok(Histogram {
        field,
        bins,
        total: values.len(),
        excluded,
    })
}

fn bin_values(values: &[f64], bin_count: usize) -> Vec<Bin> {
    let Some((min, max)) = min_max(values) else {
        return Vec::new();
    };
    if min == max {
        return vec![Bin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    // Spans past f64::MAX are binned on an axis shrunk by `n`.
    let n = bin_count as f64;
    let wide = !(max - min).is_finite();
    let scale = if wide { n } else { 1.0 };
    let width = (max / scale - min / scale) / n;
    let mut counts = vec![0usize; bin_count];
    for &v in values {
        let idx = ((v / scale - min / scale) / width).floor() as usize;
        counts[idx.min(bin_count - 1)] += 1;
    }

    let edge = |i: usize| {
        if i == bin_count {
            max
        } else if wide {
            let t = i as f64 / n;
            min * (1.0 - t) + max * t
        } else {
            min + i as f64 * width
        }
    };
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            lower: edge(i),
            upper: edge(i + 1),
            count,
        })
        .collect()
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/histogram.rs"]
mod tests;
