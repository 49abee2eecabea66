use polars::prelude::*;
use thiserror::Error;

/// Name of the ratio column in frames returned by [`value_share`].
pub const SHARE: &str = "share";
/// Name of the label column added by [`merge_labeled`].
pub const ACCEPTED: &str = "accepted";

const COUNT: &str = "count";
const TOTAL: &str = "total";

#[derive(Debug, Error)]
pub enum CountError {
  #[error("column {column:?} is missing from the {frame} frame")]
  MissingColumn { column: String, frame: &'static str },

  #[error("{value} never occurs in the full frame, so its share is undefined")]
  MissingTotal { value: String },

  #[error("percent threshold must be finite, got {0}")]
  InvalidThreshold(f64),

  #[error(transparent)]
  Polars(#[from] PolarsError),
}

#[derive(Clone, Copy)]
pub struct ShareOptions {
  /// Values with this many subset occurrences or fewer are dropped.
  pub count_threshold:   u32,
  /// Values whose share ends up at or below this fraction are dropped.
  pub percent_threshold: f64,
}

impl Default for ShareOptions {
  fn default() -> Self { ShareOptions { count_threshold: 10, percent_threshold: 0.2 } }
}

/// For each distinct value of `column` in `subset`, the fraction of that
/// value's occurrences in `full` which made it into `subset`.
///
/// Values must clear `count_threshold` on their raw subset count before
/// normalizing, then clear `percent_threshold` on the ratio. Both bounds are
/// exclusive. The result has the columns `[column, "share"]`, one row per
/// surviving value in first-appearance order.
///
/// The denominator always comes from `full`; a value of `subset` that never
/// occurs in `full` is an error, not a zero.
pub fn value_share(
  full: &DataFrame,
  subset: &DataFrame,
  column: &str,
  options: ShareOptions,
) -> Result<DataFrame, CountError> {
  if !options.percent_threshold.is_finite() {
    return Err(CountError::InvalidThreshold(options.percent_threshold));
  }
  require_column(full, column, "full")?;
  require_column(subset, column, "subset")?;

  let totals = full.clone().lazy().group_by_stable([col(column)]).agg([len().alias(TOTAL)]);

  let mut args = JoinArgs::new(JoinType::Left);
  args.maintain_order = MaintainOrderJoin::Left;

  let counted = subset
    .clone()
    .lazy()
    .group_by_stable([col(column)])
    .agg([len().alias(COUNT)])
    .filter(col(COUNT).gt(lit(options.count_threshold)))
    .join(totals, [col(column)], [col(column)], args)
    .collect()?;

  let total = counted.column(TOTAL)?;
  if total.null_count() > 0 {
    let orphaned = counted.filter(&total.as_materialized_series().is_null())?;
    let value = orphaned.column(column)?.get(0)?.str_value().into_owned();
    return Err(CountError::MissingTotal { value });
  }

  let shares = counted
    .lazy()
    .with_column(
      (col(COUNT).cast(DataType::Float64) / col(TOTAL).cast(DataType::Float64)).alias(SHARE),
    )
    .filter(col(SHARE).gt(lit(options.percent_threshold)))
    .select([col(column), col(SHARE)])
    .collect()?;

  Ok(shares)
}

fn require_column(frame: &DataFrame, column: &str, role: &'static str) -> Result<(), CountError> {
  if frame.schema().contains(column) {
    Ok(())
  } else {
    Err(CountError::MissingColumn { column: column.to_string(), frame: role })
  }
}

/// Stack two share frames, labeling rows from `accepted` with
/// `accepted = true` and rows from `rejected` with `accepted = false`.
///
/// Both inputs are copied before labeling; the flag column only exists on the
/// returned frame. Row order within each block is preserved, `accepted`
/// first.
pub fn merge_labeled(accepted: &DataFrame, rejected: &DataFrame) -> PolarsResult<DataFrame> {
  let mut merged = tag(accepted, true)?;
  merged.vstack_mut(&tag(rejected, false)?)?;
  Ok(merged)
}

fn tag(frame: &DataFrame, flag: bool) -> PolarsResult<DataFrame> {
  let mut frame = frame.clone();
  frame.with_column(Column::new(ACCEPTED.into(), vec![flag; frame.height()]))?;
  Ok(frame)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn kinds(counts: &[(&str, usize)]) -> DataFrame {
    let values: Vec<&str> =
      counts.iter().flat_map(|(value, n)| std::iter::repeat(*value).take(*n)).collect();
    df! { "kind" => values }.unwrap()
  }

  #[test]
  fn shares_are_subset_counts_over_full_counts() {
    let full = kinds(&[("A", 50), ("B", 30), ("C", 20)]);
    let subset = kinds(&[("A", 15), ("B", 5)]);

    let options = ShareOptions { count_threshold: 0, percent_threshold: 0.0 };
    let out = value_share(&full, &subset, "kind", options).unwrap();

    assert_eq!(out.height(), 2);
    let kind = out.column("kind").unwrap();
    let share = out.column(SHARE).unwrap().as_materialized_series().f64().unwrap();
    assert_eq!(kind.get(0).unwrap().str_value(), "A");
    assert!((share.get(0).unwrap() - 15.0 / 50.0).abs() < 1e-12);
    assert_eq!(kind.get(1).unwrap().str_value(), "B");
    assert!((share.get(1).unwrap() - 5.0 / 30.0).abs() < 1e-12);
  }

  #[test]
  fn thresholds_drop_low_counts_and_low_shares() {
    let full = kinds(&[("A", 50), ("B", 30), ("C", 20)]);
    let subset = kinds(&[("A", 15), ("B", 5)]);

    // B's count of 5 fails the count gate; A passes both with 15/50 = 0.3.
    let out = value_share(&full, &subset, "kind", ShareOptions::default()).unwrap();

    assert_eq!(out.height(), 1);
    let share = out.column(SHARE).unwrap().as_materialized_series().f64().unwrap();
    assert_eq!(out.column("kind").unwrap().get(0).unwrap().str_value(), "A");
    assert!((share.get(0).unwrap() - 0.3).abs() < 1e-12);
  }

  #[test]
  fn count_equal_to_threshold_is_dropped() {
    let full = kinds(&[("A", 50), ("B", 30), ("C", 20)]);
    let subset = kinds(&[("A", 15), ("B", 5)]);

    let options = ShareOptions { count_threshold: 15, percent_threshold: 0.2 };
    let out = value_share(&full, &subset, "kind", options).unwrap();

    assert_eq!(out.height(), 0);
    assert_eq!(out.get_column_names_str(), ["kind", SHARE]);
  }

  #[test]
  fn raising_thresholds_never_adds_rows() {
    let full = kinds(&[("A", 40), ("B", 40), ("C", 40)]);
    let subset = kinds(&[("A", 30), ("B", 12), ("C", 4)]);

    let mut heights = vec![];
    for (count, percent) in [(0, 0.0), (10, 0.0), (10, 0.25), (20, 0.5)] {
      let options = ShareOptions { count_threshold: count, percent_threshold: percent };
      heights.push(value_share(&full, &subset, "kind", options).unwrap().height());
    }

    assert_eq!(heights, [3, 2, 2, 1]);
    assert!(heights.windows(2).all(|pair| pair[0] >= pair[1]));
  }

  #[test]
  fn unrelated_columns_do_not_change_shares() {
    let mut with_noise = kinds(&[("A", 20), ("B", 10)]);
    with_noise.with_column(Column::new("noise".into(), (0..30).collect::<Vec<i64>>())).unwrap();
    let plain = kinds(&[("A", 20), ("B", 10)]);

    let mut subset_noise = kinds(&[("A", 12)]);
    subset_noise.with_column(Column::new("noise".into(), vec![7i64; 12])).unwrap();
    let subset_plain = kinds(&[("A", 12)]);

    let options = ShareOptions { count_threshold: 5, percent_threshold: 0.1 };
    let noisy = value_share(&with_noise, &subset_noise, "kind", options).unwrap();
    let clean = value_share(&plain, &subset_plain, "kind", options).unwrap();

    assert!(noisy.equals(&clean));
  }

  #[test]
  fn result_preserves_first_appearance_order() {
    let full = kinds(&[("A", 50), ("B", 30)]);
    let subset = kinds(&[("B", 12), ("A", 11)]);

    let options = ShareOptions { count_threshold: 10, percent_threshold: 0.0 };
    let out = value_share(&full, &subset, "kind", options).unwrap();

    let kind = out.column("kind").unwrap();
    assert_eq!(kind.get(0).unwrap().str_value(), "B");
    assert_eq!(kind.get(1).unwrap().str_value(), "A");
  }

  #[test]
  fn missing_column_reports_the_offending_frame() {
    let full = kinds(&[("A", 20)]);
    let subset = df! { "other" => ["x"] }.unwrap();

    let err = value_share(&full, &subset, "kind", ShareOptions::default()).unwrap_err();
    assert!(matches!(err, CountError::MissingColumn { frame: "subset", .. }));

    let err = value_share(&full, &full, "nope", ShareOptions::default()).unwrap_err();
    assert!(matches!(err, CountError::MissingColumn { frame: "full", .. }));
  }

  #[test]
  fn value_absent_from_full_frame_is_an_error() {
    let full = kinds(&[("A", 50)]);
    let subset = kinds(&[("Z", 12)]);

    let err = value_share(&full, &subset, "kind", ShareOptions::default()).unwrap_err();
    match err {
      CountError::MissingTotal { value } => assert_eq!(value, "Z"),
      other => panic!("expected MissingTotal, got {other}"),
    }
  }

  #[test]
  fn non_finite_percent_threshold_is_rejected() {
    let full = kinds(&[("A", 20)]);

    let options = ShareOptions { count_threshold: 0, percent_threshold: f64::NAN };
    let err = value_share(&full, &full, "kind", options).unwrap_err();
    assert!(matches!(err, CountError::InvalidThreshold(_)));
  }

  #[test]
  fn merge_labeled_stacks_and_flags_both_blocks() {
    let accepted = df! { "kind" => ["A", "B", "C"], SHARE => [0.5, 0.4, 0.3] }.unwrap();
    let rejected = df! { "kind" => ["A", "D"], SHARE => [0.2, 0.9] }.unwrap();

    let merged = merge_labeled(&accepted, &rejected).unwrap();

    assert_eq!(merged.height(), 5);
    let flags: Vec<bool> = merged
      .column(ACCEPTED)
      .unwrap()
      .as_materialized_series()
      .bool()
      .unwrap()
      .into_iter()
      .map(|flag| flag.unwrap())
      .collect();
    assert_eq!(flags, [true, true, true, false, false]);

    // The inputs themselves stay unlabeled.
    assert!(accepted.column(ACCEPTED).is_err());
    assert!(rejected.column(ACCEPTED).is_err());
  }
}
