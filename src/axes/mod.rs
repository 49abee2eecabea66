mod bar_chart;
mod grouped;

pub use bar_chart::BarChartAxes;
pub use grouped::GroupedBarChartAxes;

use kurbo::Affine;
use polars::prelude::*;

use crate::{Plot, bounds::DataBounds, render::Render};

pub enum Axes<'a> {
  BarChart(BarChartAxes<'a>),
  GroupedBarChart(GroupedBarChartAxes<'a>),
}

impl<'a> Plot<'a> {
  pub fn bar_chart(&mut self, labels: &'a Column, values: &'a Column) -> &mut BarChartAxes<'a> {
    self.axes.push(Axes::BarChart(BarChartAxes::new(labels, values)));
    match self.axes.last_mut().unwrap() {
      Axes::BarChart(ax) => ax,
      _ => unreachable!(),
    }
  }

  pub fn grouped_bar_chart(
    &mut self,
    labels: &'a Column,
    values: &'a Column,
    hue: &'a Column,
  ) -> &mut GroupedBarChartAxes<'a> {
    self.axes.push(Axes::GroupedBarChart(GroupedBarChartAxes::new(labels, values, hue)));
    match self.axes.last_mut().unwrap() {
      Axes::GroupedBarChart(ax) => ax,
      _ => unreachable!(),
    }
  }
}

impl Axes<'_> {
  pub(crate) fn data_bounds(&self) -> PolarsResult<DataBounds<'_>> {
    match self {
      Axes::BarChart(ax) => ax.data_bounds(),
      Axes::GroupedBarChart(ax) => ax.data_bounds(),
    }
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    match self {
      Axes::BarChart(ax) => ax.draw(render, transform),
      Axes::GroupedBarChart(ax) => ax.draw(render, transform),
    }
  }
}
