use std::borrow::Cow;

use kurbo::Affine;
use polars::prelude::Column;

#[derive(Clone, Copy)]
pub struct Bounds {
  pub x: Range,
  pub y: Range,
}

/// Data-space extent of one axes, before it is resolved against axis
/// overrides and mapped onto the viewport.
#[derive(Clone)]
pub struct DataBounds<'a> {
  pub x: DataRange<'a>,
  pub y: DataRange<'a>,
}

#[derive(Clone)]
pub enum DataRange<'a> {
  Continuous { range: Range, margin_min: bool, margin_max: bool },
  /// One slot per row of the column, labeled by the row's value.
  Categorical(Cow<'a, Column>),
}

#[derive(Clone, Copy)]
pub struct Range {
  pub min: f64,
  pub max: f64,
}

impl Bounds {
  pub const fn new(x: Range, y: Range) -> Self { Bounds { x, y } }

  pub const fn shrink(self, amount: f64) -> Self {
    Bounds { x: self.x.shrink(amount), y: self.y.shrink(amount) }
  }

  pub(crate) fn transform_to(&self, viewport: Bounds) -> Affine {
    let scale_x = viewport.x.size() / self.x.size();
    let scale_y = viewport.y.size() / self.y.size();
    let translate_x = viewport.x.min - self.x.min * scale_x;
    let translate_y = viewport.y.min - self.y.min * scale_y;

    Affine::new([scale_x, 0.0, 0.0, scale_y, translate_x, translate_y])
  }
}

impl<'a> DataBounds<'a> {
  pub(crate) fn union(self, other: DataBounds<'a>) -> DataBounds<'a> {
    DataBounds { x: self.x.union(other.x), y: self.y.union(other.y) }
  }
}

impl<'a> DataRange<'a> {
  fn union(self, other: DataRange<'a>) -> DataRange<'a> {
    match (self, other) {
      // A categorical axis wins over a continuous one, and the longer label
      // column wins between two categorical axes.
      (DataRange::Categorical(a), DataRange::Categorical(b)) => {
        DataRange::Categorical(if b.len() > a.len() { b } else { a })
      }
      (DataRange::Categorical(a), DataRange::Continuous { .. }) => DataRange::Categorical(a),
      (DataRange::Continuous { .. }, DataRange::Categorical(b)) => DataRange::Categorical(b),
      (
        DataRange::Continuous { range: a, margin_min: min_a, margin_max: max_a },
        DataRange::Continuous { range: b, margin_min: min_b, margin_max: max_b },
      ) => DataRange::Continuous {
        range:      a.union(b),
        margin_min: min_a || min_b,
        margin_max: max_a || max_b,
      },
    }
  }

  pub(crate) fn resolve(&self) -> Range {
    match self {
      DataRange::Categorical(labels) => Range::new(-0.5, labels.len() as f64 - 0.5),
      DataRange::Continuous { range, margin_min, margin_max } => {
        let margin = range.size() * 0.05;
        let mut range = *range;
        if *margin_min {
          range.min -= margin;
        }
        if *margin_max {
          range.max += margin;
        }
        range
      }
    }
  }
}

impl Range {
  pub const fn empty() -> Self { Range { min: 0.0, max: 0.0 } }
  pub const fn new(min: f64, max: f64) -> Self { Range { min, max } }
  pub const fn size(&self) -> f64 { self.max - self.min }

  pub const fn shrink(self, amount: f64) -> Self { self.expand(-amount) }
  pub const fn expand(self, amount: f64) -> Self {
    Range {
      min: self.min - amount * self.size().signum(),
      max: self.max + amount * self.size().signum(),
    }
  }

  pub const fn contains(&self, value: &f64) -> bool {
    (*value >= self.min && *value <= self.max) || (*value <= self.min && *value >= self.max)
  }

  pub fn union(&self, other: Range) -> Range {
    if self.size() == 0.0 {
      other
    } else if other.size() == 0.0 {
      *self
    } else {
      Range { min: self.min.min(other.min), max: self.max.max(other.max) }
    }
  }

  pub fn nice_ticks(&self, count: u32) -> NiceTicksIter {
    let step = (self.max - self.min) / f64::from(count);
    let k = step.log10().floor();
    let base = step / 10f64.powf(k);

    let nice_base = match base {
      b if b < 1.0 => 1.0,
      b if b < 2.0 => 2.0,
      b if b < 2.5 => 2.5,
      b if b < 5.0 => 5.0,
      _ => 10.0,
    };

    let step = nice_base * 10f64.powf(k);
    let lo = (self.min / step).floor() * step;
    let hi = (self.max / step).ceil() * step;

    let precision = (-k as i32 + 4).max(0) as usize;
    NiceTicksIter::new(lo, hi, step, precision)
  }
}

pub struct NiceTicksIter {
  current:   f64,
  step:      f64,
  hi:        f64,
  precision: usize,
}

impl NiceTicksIter {
  fn new(lo: f64, hi: f64, step: f64, precision: usize) -> Self {
    NiceTicksIter { current: lo, step, hi, precision }
  }

  pub fn precision(&self) -> usize { self.precision }
}

impl Iterator for NiceTicksIter {
  type Item = f64;
  fn next(&mut self) -> Option<Self::Item> {
    if self.current < self.hi + self.step * 0.5 {
      let p = 10f64.powi(self.precision as i32);
      let result = (self.current * p).round() / p;
      self.current += self.step;
      Some(result)
    } else {
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn nice_ticks_cover_the_whole_range() {
    let ticks: Vec<f64> = Range::new(0.0, 1.0).nice_ticks(10).collect();

    assert_eq!(ticks.first(), Some(&0.0));
    assert_eq!(ticks.last(), Some(&1.0));
    assert!(ticks.windows(2).all(|pair| pair[1] > pair[0]));
  }

  #[test]
  fn nice_ticks_snap_to_round_steps() {
    let ticks: Vec<f64> = Range::new(0.0, 0.34).nice_ticks(10).collect();

    // 0.034 per tick snaps up to 0.05.
    assert_eq!(ticks, [0.0, 0.05, 0.1, 0.15, 0.2, 0.25, 0.3, 0.35]);
  }

  #[test]
  fn union_ignores_empty_ranges() {
    let range = Range::empty().union(Range::new(2.0, 3.0));
    assert_eq!((range.min, range.max), (2.0, 3.0));

    let range = Range::new(-1.0, 4.0).union(Range::new(2.0, 8.0));
    assert_eq!((range.min, range.max), (-1.0, 8.0));
  }

  #[test]
  fn categorical_ranges_center_each_slot() {
    let labels = Column::new("labels".into(), ["a", "b", "c"]);
    let range = DataRange::Categorical(Cow::Owned(labels)).resolve();

    assert_eq!((range.min, range.max), (-0.5, 2.5));
  }
}
