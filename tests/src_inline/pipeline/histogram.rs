use super::*;
use crate::model::{AttributeId, Dataset, Schema, Selection};
use crate::pipeline::filter::apply_selection;

fn dataset(rows: &[(&str, Option<f64>)]) -> Dataset {
    let schema = Schema {
        identifier: "COMP_NAME".to_string(),
        categories: vec!["COMP_SIZE".to_string()],
        primary: "total_weighted_score".to_string(),
        secondary: vec!["cat1_weighted_score".to_string()],
    };
    let records = rows
        .iter()
        .enumerate()
        .map(|(i, (size, score))| Record {
            name: format!("org-{i}"),
            categories: vec![size.to_string()],
            primary: *score,
            secondary: vec![score.map(|s| s / 10.0)],
        })
        .collect();
    Dataset::new(schema, records)
}

fn all_hist(ds: &Dataset, bins: usize) -> Histogram {
    let view = apply_selection(ds, AttributeId(0), &Selection::All).unwrap();
    histogram(&view, ScoreField::Primary, bins).unwrap()
}

fn count_sum(h: &Histogram) -> usize {
    h.bins.iter().map(|b| b.count).sum()
}

#[test]
fn test_scenario_single_bin() {
    let ds = dataset(&[
        ("S", Some(10.0)),
        ("S", Some(20.0)),
        ("M", Some(30.0)),
        ("L", Some(40.0)),
        ("M", Some(50.0)),
    ]);
    let view = apply_selection(&ds, AttributeId(0), &Selection::Value("M".to_string())).unwrap();
    let h = histogram(&view, ScoreField::Primary, 1).unwrap();
    assert_eq!(
        h.bins,
        vec![Bin {
            lower: 30.0,
            upper: 50.0,
            count: 2
        }]
    );
}

#[test]
fn test_counts_sum_to_view_size() {
    let rows: Vec<(&str, Option<f64>)> = (0..37)
        .map(|i| ("S", Some((i * 7 % 23) as f64 + 0.5)))
        .collect();
    let ds = dataset(&rows);
    for bins in [1, 2, 3, 7, 10, 50] {
        let h = all_hist(&ds, bins);
        assert_eq!(h.bins.len(), bins);
        assert_eq!(count_sum(&h), 37);
        assert_eq!(h.total, 37);
    }
}

#[test]
fn test_equal_width_edges_and_closed_last_bin() {
    let ds = dataset(&[("S", Some(0.0)), ("S", Some(5.0)), ("S", Some(9.99)), ("S", Some(10.0))]);
    let h = all_hist(&ds, 2);
    assert_eq!(h.bins[0].lower, 0.0);
    assert_eq!(h.bins[0].upper, 5.0);
    assert_eq!(h.bins[1].lower, 5.0);
    assert_eq!(h.bins[1].upper, 10.0);
    // 5.0 opens the second bin; 10.0 (max) is kept in the last one
    assert_eq!(h.bins[0].count, 1);
    assert_eq!(h.bins[1].count, 3);
}

#[test]
fn test_single_value_collapses() {
    let ds = dataset(&[("S", Some(42.0)), ("M", Some(42.0)), ("L", Some(42.0))]);
    let h = all_hist(&ds, 10);
    assert_eq!(
        h.bins,
        vec![Bin {
            lower: 42.0,
            upper: 42.0,
            count: 3
        }]
    );

    let ds = dataset(&[("S", Some(7.0))]);
    assert_eq!(all_hist(&ds, 10).bins.len(), 1);
}

#[test]
fn test_empty_view_has_no_bins() {
    let ds = dataset(&[]);
    let h = all_hist(&ds, 10);
    assert!(h.bins.is_empty());
    assert_eq!(h.total, 0);
    assert_eq!(h.excluded, 0);
}

#[test]
fn test_missing_scores_excluded_and_counted() {
    let ds = dataset(&[("S", Some(1.0)), ("S", None), ("M", Some(3.0)), ("M", None)]);
    let h = all_hist(&ds, 4);
    assert_eq!(h.excluded, 2);
    assert_eq!(h.total, 2);
    assert_eq!(count_sum(&h) + h.excluded, ds.len());

    let ds = dataset(&[("S", None)]);
    let h = all_hist(&ds, 4);
    assert!(h.bins.is_empty());
    assert_eq!(h.excluded, 1);
}

#[test]
fn test_bin_count_guard() {
    let ds = dataset(&[("S", Some(1.0))]);
    let view = apply_selection(&ds, AttributeId(0), &Selection::All).unwrap();
    assert_eq!(
        histogram(&view, ScoreField::Primary, 0),
        Err(HistogramError::InvalidBinCount {
            got: 0,
            max: MAX_BIN_COUNT
        })
    );
    assert!(histogram(&view, ScoreField::Primary, MAX_BIN_COUNT + 1).is_err());
    assert!(histogram(&view, ScoreField::Primary, MAX_BIN_COUNT).is_ok());
}

#[test]
fn test_secondary_field() {
    let ds = dataset(&[("S", Some(10.0)), ("S", Some(30.0))]);
    let view = apply_selection(&ds, AttributeId(0), &Selection::All).unwrap();
    let h = histogram(&view, ScoreField::Secondary(0), 2).unwrap();
    assert_eq!(h.bins[0].lower, 1.0);
    assert_eq!(h.bins[1].upper, 3.0);
    assert_eq!(
        histogram(&view, ScoreField::Secondary(3), 2),
        Err(HistogramError::UnknownField(3))
    );
}

#[test]
fn test_secondary_field_checked_on_empty_view() {
    let ds = dataset(&[]);
    let view = apply_selection(&ds, AttributeId(0), &Selection::All).unwrap();
    assert_eq!(
        histogram(&view, ScoreField::Secondary(1), 2),
        Err(HistogramError::UnknownField(1))
    );
    assert!(histogram(&view, ScoreField::Secondary(0), 2).is_ok());
}

#[test]
fn test_extreme_range_keeps_finite_edges() {
    let ds = dataset(&[("S", Some(f64::MAX)), ("S", Some(-f64::MAX)), ("M", Some(0.0))]);
    for bins in [1, 2, 10] {
        let h = all_hist(&ds, bins);
        assert_eq!(h.bins.len(), bins);
        assert_eq!(count_sum(&h), 3);
        assert!(h.bins.iter().all(|b| b.lower.is_finite() && b.upper.is_finite()));
        assert!(h.bins.windows(2).all(|w| w[0].upper == w[1].lower));
        assert!(h.bins.iter().all(|b| b.lower <= b.upper));
        assert_eq!(h.bins[0].lower, -f64::MAX);
        assert_eq!(h.bins[bins - 1].upper, f64::MAX);
        assert_eq!(h.bins[0].count, if bins == 1 { 3 } else { 1 });
    }
    let h = all_hist(&ds, 10);
    assert_eq!(h.bins[9].count, 1);
    let h = all_hist(&ds, 2);
    assert_eq!(h.bins[0].upper, 0.0);
    assert_eq!(h.bins[1].count, 2);
}
