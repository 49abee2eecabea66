use color::{HueDirection, Oklch, OpaqueColor};

pub struct LinearPalette {
  start: OpaqueColor<Oklch>,
  end:   OpaqueColor<Oklch>,
}

pub const ROCKET: LinearPalette =
  LinearPalette::new(OpaqueColor::new([0.7, 0.13, 50.0]), OpaqueColor::new([0.7, 0.13, 290.0]));

impl LinearPalette {
  pub const fn new(start: OpaqueColor<Oklch>, end: OpaqueColor<Oklch>) -> Self {
    Self { start, end }
  }

  pub fn sample(&self, t: f32) -> OpaqueColor<Oklch> {
    let t = t.clamp(0.0, 1.0);
    self.start.lerp(self.end, t, HueDirection::Shorter)
  }
}

/// Fixed set of muted categorical colors, cycled by index.
pub struct QualitativePalette {
  colors: [OpaqueColor<Oklch>; 8],
}

pub const SET2: QualitativePalette = QualitativePalette::new([
  OpaqueColor::new([0.75, 0.10, 170.0]),
  OpaqueColor::new([0.73, 0.12, 45.0]),
  OpaqueColor::new([0.70, 0.08, 280.0]),
  OpaqueColor::new([0.73, 0.12, 340.0]),
  OpaqueColor::new([0.78, 0.13, 130.0]),
  OpaqueColor::new([0.87, 0.14, 95.0]),
  OpaqueColor::new([0.82, 0.06, 75.0]),
  OpaqueColor::new([0.76, 0.0, 0.0]),
]);

impl QualitativePalette {
  pub const fn new(colors: [OpaqueColor<Oklch>; 8]) -> Self { Self { colors } }

  pub fn color(&self, index: usize) -> OpaqueColor<Oklch> {
    self.colors[index % self.colors.len()]
  }
}
