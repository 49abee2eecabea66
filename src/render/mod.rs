use std::path::Path;

use color::{Oklch, OpaqueColor, Srgb};
use kurbo::{Affine, Point, Shape, Stroke, Vec2};
use parley::{
  Alignment, AlignmentOptions, FontContext, FontWeight, Layout, LayoutContext,
  PositionedLayoutItem, StyleProperty,
};
use peniko::{Brush, Color, Fill};
use vello::wgpu::{self, TextureDescriptor};

use crate::Plot;

pub(crate) mod texture;
pub(crate) mod window;

pub struct Render {
  pub scene:      vello::Scene,
  pub background: Color,

  font:   FontContext,
  layout: LayoutContext<Brush>,
}

#[derive(Clone, Copy, Default, PartialEq)]
pub enum Align {
  #[default]
  Start,
  Center,
  End,
}

/// A single run of text, anchored at `position` according to the alignment
/// fields. `transform` rotates about the anchor, after alignment.
pub struct DrawText<'a> {
  pub text:      &'a str,
  pub size:      f32,
  pub weight:    FontWeight,
  pub brush:     Brush,
  pub position:  Point,
  pub transform: Affine,

  pub horizontal_align: Align,
  pub vertical_align:   Align,
}

impl Default for DrawText<'_> {
  fn default() -> Self {
    DrawText {
      text:             "",
      size:             16.0,
      weight:           FontWeight::NORMAL,
      brush:            Brush::Solid(Color::from_rgb8(32, 32, 32)),
      position:         Point::ZERO,
      transform:        Affine::IDENTITY,
      horizontal_align: Align::Start,
      vertical_align:   Align::Start,
    }
  }
}

pub(crate) trait IntoBrush {
  fn into_brush(self) -> Brush;
}

impl IntoBrush for Brush {
  fn into_brush(self) -> Brush { self }
}
impl IntoBrush for &Brush {
  fn into_brush(self) -> Brush { self.clone() }
}
impl IntoBrush for OpaqueColor<Oklch> {
  fn into_brush(self) -> Brush { Brush::Solid(self.convert::<Srgb>().with_alpha(1.0)) }
}

impl Render {
  pub fn new() -> Self {
    Render {
      scene:      vello::Scene::new(),
      background: Color::WHITE,
      font:       FontContext::new(),
      layout:     LayoutContext::new(),
    }
  }

  pub fn fill(&mut self, shape: &impl Shape, transform: Affine, brush: impl IntoBrush) {
    self.scene.fill(Fill::NonZero, transform, &brush.into_brush(), None, shape);
  }

  pub fn stroke(
    &mut self,
    shape: &impl Shape,
    transform: Affine,
    brush: impl IntoBrush,
    stroke: &Stroke,
  ) {
    self.scene.stroke(stroke, transform, &brush.into_brush(), None, shape);
  }

  pub fn layout_text(&mut self, text: &DrawText) -> Layout<Brush> {
    let mut builder = self.layout.ranged_builder(&mut self.font, text.text, 1.0, true);

    builder.push_default(StyleProperty::FontSize(text.size));
    builder.push_default(StyleProperty::FontWeight(text.weight));
    builder.push_default(StyleProperty::Brush(text.brush.clone()));

    let mut layout = builder.build(text.text);
    layout.break_all_lines(None);
    layout.align(None, Alignment::Start, AlignmentOptions::default());
    layout
  }

  pub fn draw_text(&mut self, text: DrawText) {
    let layout = self.layout_text(&text);
    self.draw_text_layout(layout, text);
  }

  pub fn draw_text_layout(&mut self, layout: Layout<Brush>, text: DrawText) {
    let offset = Vec2::new(
      match text.horizontal_align {
        Align::Start => 0.0,
        Align::Center => -f64::from(layout.width()) / 2.0,
        Align::End => -f64::from(layout.width()),
      },
      match text.vertical_align {
        Align::Start => 0.0,
        Align::Center => -f64::from(layout.height()) / 2.0,
        Align::End => -f64::from(layout.height()),
      },
    );
    let transform =
      Affine::translate(text.position.to_vec2()) * text.transform * Affine::translate(offset);

    for line in layout.lines() {
      for item in line.items() {
        let PositionedLayoutItem::GlyphRun(glyph_run) = item else { continue };

        let run = glyph_run.run();
        let mut x = glyph_run.offset();
        let baseline = glyph_run.baseline();

        self
          .scene
          .draw_glyphs(run.font())
          .brush(&glyph_run.style().brush)
          .hint(false)
          .transform(transform)
          .glyph_transform(
            run.synthesis().skew().map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0)),
          )
          .font_size(run.font_size())
          .normalized_coords(run.normalized_coords())
          .draw(
            Fill::NonZero,
            glyph_run.glyphs().map(|glyph| {
              let gx = x + glyph.x;
              let gy = baseline + glyph.y;
              x += glyph.advance;
              vello::Glyph { id: glyph.id.into(), x: gx, y: gy }
            }),
          );
      }
    }
  }
}

pub(crate) struct GpuHandle {
  pub device:  wgpu::Device,
  pub queue:   wgpu::Queue,
  pub texture: wgpu::Texture,
  pub view:    wgpu::TextureView,
}

pub(crate) struct RenderConfig {
  pub width:  u32,
  pub height: u32,
}

impl Plot<'_> {
  pub fn save(&self, path: impl AsRef<Path>) {
    let config = RenderConfig { width: 1024, height: 1024 };
    let handle = GpuHandle::new(&config, None);

    let mut render = Render::new();
    self.draw(&mut render);

    let mut renderer = vello::Renderer::new(&handle.device, vello::RendererOptions::default())
      .expect("Failed to create renderer");

    renderer
      .render_to_texture(
        &handle.device,
        &handle.queue,
        &render.scene,
        &handle.view,
        &vello::RenderParams {
          base_color:          render.background,
          width:               config.width,
          height:              config.height,
          antialiasing_method: vello::AaConfig::Msaa16,
        },
      )
      .expect("Failed to render to a texture");

    texture::render(handle, config, path.as_ref());
  }
}

impl GpuHandle {
  pub fn new(config: &RenderConfig, adapter: Option<wgpu::Adapter>) -> Self {
    let adapter = match adapter {
      Some(adapter) => adapter,
      None => {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
          .expect("Failed to create adapter")
      }
    };

    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
      label:             None,
      required_features: wgpu::Features::empty(),
      required_limits:   wgpu::Limits::defaults(),
      memory_hints:      wgpu::MemoryHints::MemoryUsage,
      trace:             wgpu::Trace::Off,
    }))
    .expect("Failed to create device");

    let texture = Self::create_texture(&device, config);
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    GpuHandle { device, queue, texture, view }
  }

  pub fn resize(&mut self, config: &RenderConfig) {
    self.texture = Self::create_texture(&self.device, config);
    self.view = self.texture.create_view(&wgpu::TextureViewDescriptor::default());
  }

  fn create_texture(device: &wgpu::Device, config: &RenderConfig) -> wgpu::Texture {
    device.create_texture(&TextureDescriptor {
      label:           Some("Render Texture"),
      size:            config.extent_3d(),
      mip_level_count: 1,
      sample_count:    1,
      dimension:       wgpu::TextureDimension::D2,
      format:          wgpu::TextureFormat::Rgba8Unorm,
      usage:           wgpu::TextureUsages::STORAGE_BINDING
        | wgpu::TextureUsages::COPY_SRC
        | wgpu::TextureUsages::TEXTURE_BINDING,
      view_formats:    &[],
    })
  }
}

impl RenderConfig {
  fn extent_3d(&self) -> wgpu::Extent3d {
    wgpu::Extent3d {
      width:                 self.width,
      height:                self.height,
      depth_or_array_layers: 1,
    }
  }
}
