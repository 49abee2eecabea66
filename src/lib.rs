use kurbo::{Affine, Cap, Line, Point, Stroke};
use parley::FontWeight;
use peniko::{Brush, Color};

use crate::{
  axes::Axes,
  bounds::{DataBounds, DataRange},
  render::{Align, DrawText, Render},
};

mod axes;
mod bounds;
mod counts;
mod legend;
mod render;
mod theme;

pub use axes::{BarChartAxes, GroupedBarChartAxes};
pub use bounds::{Bounds, Range};
pub use counts::{ACCEPTED, CountError, SHARE, ShareOptions, merge_labeled, value_share};

/// Degrees the category tick labels are rotated by.
const TICK_ROTATION: f64 = 75.0;

#[derive(Default)]
pub struct Plot<'a> {
  title: Option<String>,
  pub x: Axis,
  pub y: Axis,

  axes: Vec<Axes<'a>>,
}

#[derive(Default)]
pub struct Axis {
  title: Option<String>,
  min:   Option<f64>,
  max:   Option<f64>,
}

impl Axis {
  pub fn title(&mut self, title: &str) -> &mut Self {
    self.title = Some(title.to_string());
    self
  }

  pub fn min(&mut self, min: f64) -> &mut Self {
    self.min = Some(min);
    self
  }

  pub fn max(&mut self, max: f64) -> &mut Self {
    self.max = Some(max);
    self
  }

  fn apply(&self, mut range: Range) -> Range {
    if let Some(min) = self.min {
      range.min = min;
    }
    if let Some(max) = self.max {
      range.max = max;
    }
    range
  }
}

impl<'a> Plot<'a> {
  pub fn new() -> Plot<'a> { Plot::default() }

  pub fn title(&mut self, title: &str) -> &mut Self {
    self.title = Some(title.to_string());
    self
  }

  pub fn show(&self) { render::window::show(self); }
}

impl Plot<'_> {
  fn draw(&self, render: &mut Render) {
    const TEXT_COLOR: Brush = Brush::Solid(Color::from_rgb8(32, 32, 32));
    const LINE_COLOR: Brush = Brush::Solid(Color::from_rgb8(128, 128, 128));

    let viewport = Bounds::new(Range::new(0.0, 1000.0), Range::new(1000.0, 0.0)).shrink(80.0);

    if let Some(title) = &self.title {
      render.draw_text(DrawText {
        text: title,
        size: 32.0,
        weight: FontWeight::BOLD,
        brush: TEXT_COLOR,
        position: Point { x: 500.0, y: viewport.y.max - 30.0 },
        horizontal_align: Align::Center,
        ..Default::default()
      });
    }

    if let Some(x_title) = &self.x.title {
      render.draw_text(DrawText {
        text: x_title,
        size: 24.0,
        position: Point { x: 500.0, y: viewport.y.min + 60.0 },
        brush: TEXT_COLOR,
        horizontal_align: Align::Center,
        vertical_align: Align::Start,
        ..Default::default()
      });
    }

    if let Some(y_title) = &self.y.title {
      render.draw_text(DrawText {
        text: y_title,
        size: 24.0,
        position: Point { x: viewport.x.min - 40.0, y: 500.0 },
        brush: TEXT_COLOR,
        transform: Affine::rotate(-std::f64::consts::FRAC_PI_2),
        horizontal_align: Align::Center,
        vertical_align: Align::End,
        ..Default::default()
      });
    }

    let border_stroke = Stroke::new(2.0);
    render.stroke(
      &Line::new(
        Point::new(viewport.x.min, viewport.y.min),
        Point::new(viewport.x.max, viewport.y.min),
      ),
      Affine::IDENTITY,
      &LINE_COLOR,
      &border_stroke,
    );
    render.stroke(
      &Line::new(
        Point::new(viewport.x.min, viewport.y.min),
        Point::new(viewport.x.min, viewport.y.max),
      ),
      Affine::IDENTITY,
      &LINE_COLOR,
      &border_stroke,
    );

    let mut data_bounds: Option<DataBounds> = None;
    for ax in &self.axes {
      let Some(bounds) = ax.data_bounds().log_err() else { continue };
      data_bounds = Some(match data_bounds {
        Some(acc) => acc.union(bounds),
        None => bounds,
      });
    }
    let Some(data_bounds) = data_bounds else { return };

    let bounds =
      Bounds::new(self.x.apply(data_bounds.x.resolve()), self.y.apply(data_bounds.y.resolve()));
    let transform = bounds.transform_to(viewport);

    let ticks = 10;
    let tick_stroke = border_stroke.clone().with_start_cap(Cap::Butt);

    let iter = bounds.y.nice_ticks(ticks);
    let precision = iter.precision();
    for (y, vy) in iter
      .map(|v| (v, (transform * Point::new(0.0, v)).y))
      .filter(|(_, vy)| viewport.y.contains(vy))
    {
      render.stroke(
        &Line::new(Point::new(viewport.x.min, vy), Point::new(viewport.x.min - 10.0, vy)),
        Affine::IDENTITY,
        &LINE_COLOR,
        &tick_stroke,
      );
      render.draw_text(DrawText {
        text: &format!("{:.*}", precision.saturating_sub(3), y),
        size: 12.0,
        position: Point { x: viewport.x.min - 15.0, y: vy },
        brush: TEXT_COLOR,
        horizontal_align: Align::End,
        vertical_align: Align::Center,
        ..Default::default()
      });
    }

    match &data_bounds.x {
      DataRange::Categorical(labels) => {
        for i in 0..labels.len() {
          let Some(label) = labels.get(i).log_err() else { continue };
          let vx = (transform * Point::new(i as f64, 0.0)).x;
          if !viewport.x.contains(&vx) {
            continue;
          }

          render.stroke(
            &Line::new(Point::new(vx, viewport.y.min), Point::new(vx, viewport.y.min + 10.0)),
            Affine::IDENTITY,
            &LINE_COLOR,
            &tick_stroke,
          );
          render.draw_text(DrawText {
            text: &label.str_value(),
            size: 12.0,
            position: Point { x: vx, y: viewport.y.min + 14.0 },
            brush: TEXT_COLOR,
            transform: Affine::rotate(-TICK_ROTATION.to_radians()),
            horizontal_align: Align::End,
            vertical_align: Align::Center,
            ..Default::default()
          });
        }
      }

      DataRange::Continuous { .. } => {
        let iter = bounds.x.nice_ticks(ticks);
        let precision = iter.precision();
        for (x, vx) in iter
          .map(|v| (v, (transform * Point::new(v, 0.0)).x))
          .filter(|(_, vx)| viewport.x.contains(vx))
        {
          render.stroke(
            &Line::new(Point::new(vx, viewport.y.min), Point::new(vx, viewport.y.min + 10.0)),
            Affine::IDENTITY,
            &LINE_COLOR,
            &tick_stroke,
          );
          render.draw_text(DrawText {
            text: &format!("{:.*}", precision.saturating_sub(3), x),
            size: 12.0,
            position: Point { x: vx, y: viewport.y.min + 15.0 },
            brush: TEXT_COLOR,
            horizontal_align: Align::Center,
            vertical_align: Align::Start,
            ..Default::default()
          });
        }
      }
    }

    for ax in &self.axes {
      ax.draw(render, transform);
    }

    self.draw_legend(render, viewport);
  }
}

pub(crate) trait ResultExt<T> {
  fn log_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
  fn log_err(self) -> Option<T> {
    match self {
      Ok(value) => Some(value),
      Err(e) => {
        log::warn!("{e}");
        None
      }
    }
  }
}
