use std::{borrow::Cow, collections::HashMap};

use kurbo::{Affine, BezPath, Point};
use polars::prelude::*;

use crate::{
  Range, ResultExt,
  bounds::{DataBounds, DataRange},
  render::Render,
};

/// Bars clustered per label, one sub-bar per distinct hue key.
///
/// Rows sharing a label land in the same cluster, so a frame produced by
/// [`crate::merge_labeled`] draws its `accepted` and rejected shares side by
/// side.
pub struct GroupedBarChartAxes<'a> {
  labels: &'a Column,
  values: &'a Column,
  hue:    &'a Column,
}

impl<'a> GroupedBarChartAxes<'a> {
  pub(crate) fn new(labels: &'a Column, values: &'a Column, hue: &'a Column) -> Self {
    GroupedBarChartAxes { labels, values, hue }
  }

  /// Distinct labels in first-appearance order, one x slot each.
  fn groups(&self) -> PolarsResult<Column> { self.labels.unique_stable() }

  /// Distinct hue keys in first-appearance order.
  pub(crate) fn keys(&self) -> PolarsResult<Vec<AnyValue<'static>>> {
    Ok(
      self
        .hue
        .unique_stable()?
        .as_materialized_series()
        .iter()
        .map(|key| key.into_static())
        .collect(),
    )
  }

  pub(crate) fn data_bounds(&self) -> PolarsResult<DataBounds<'_>> {
    Ok(DataBounds {
      x: DataRange::Categorical(Cow::Owned(self.groups()?)),
      y: DataRange::Continuous {
        range:      Range::new(
          0.0,
          self.values.max_reduce()?.into_value().try_extract::<f64>()?,
        ),
        margin_min: false,
        margin_max: true,
      },
    })
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    const GROUP_WIDTH: f64 = 0.8;

    let Some(groups) = self.groups().log_err() else { return };
    let Some(keys) = self.keys().log_err() else { return };
    if keys.is_empty() {
      return;
    }

    let slots: HashMap<AnyValue, usize> =
      groups.as_materialized_series().iter().enumerate().map(|(i, v)| (v, i)).collect();
    let hues: HashMap<AnyValue, usize> =
      keys.iter().cloned().enumerate().map(|(i, v)| (v, i)).collect();

    let bar = GROUP_WIDTH / keys.len() as f64;
    let mut fills: Vec<BezPath> = keys.iter().map(|_| BezPath::new()).collect();

    for i in 0..self.labels.len() {
      let Some(label) = self.labels.get(i).log_err() else { continue };
      let Some(hue) = self.hue.get(i).log_err() else { continue };
      let Some(value) = self.values.get(i).and_then(|v| v.try_extract::<f64>()).log_err() else {
        continue;
      };

      let (Some(&slot), Some(&key)) = (slots.get(&label), hues.get(&hue)) else { continue };

      let x = slot as f64 - GROUP_WIDTH / 2.0 + key as f64 * bar;
      let fill = &mut fills[key];
      fill.move_to(Point::new(x, 0.0));
      fill.line_to(Point::new(x, value));
      fill.line_to(Point::new(x + bar, value));
      fill.line_to(Point::new(x + bar, 0.0));
      fill.close_path();
    }

    for (key, fill) in fills.iter().enumerate() {
      render.fill(fill, transform, crate::theme::SET2.color(key));
    }
  }
}
