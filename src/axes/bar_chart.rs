use std::borrow::Cow;

use kurbo::{Affine, BezPath, Point};
use polars::prelude::*;

use crate::{
  Range, ResultExt,
  bounds::{DataBounds, DataRange},
  render::Render,
};

pub struct BarChartAxes<'a> {
  labels: &'a Column,
  values: &'a Column,
}

impl<'a> BarChartAxes<'a> {
  pub(crate) fn new(labels: &'a Column, values: &'a Column) -> Self {
    BarChartAxes { labels, values }
  }

  pub(crate) fn data_bounds(&self) -> PolarsResult<DataBounds<'_>> {
    Ok(DataBounds {
      x: DataRange::Categorical(Cow::Borrowed(self.labels)),
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
    const WIDTH: f64 = 0.3;

    let mut fill = BezPath::new();
    for x in 0..self.labels.len() {
      let Some(value) = self.values.get(x).and_then(|v| v.try_extract::<f64>()).log_err() else {
        continue;
      };

      fill.move_to(Point::new(x as f64 - WIDTH, 0.0));
      fill.line_to(Point::new(x as f64 - WIDTH, value));
      fill.line_to(Point::new(x as f64 + WIDTH, value));
      fill.line_to(Point::new(x as f64 + WIDTH, 0.0));
      fill.close_path();
    }

    render.fill(&fill, transform, crate::theme::ROCKET.sample(0.0));
  }
}
