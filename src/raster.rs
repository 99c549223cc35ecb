//! Flattening the base image and committed shapes into one bitmap, using tiny-skia for strokes
//! and ab_glyph for text.

use ab_glyph::{Font as _, FontArc, ScaleFont as _};
use image::RgbaImage;
use tiny_skia::{
    Color, ColorU8, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint,
    PremultipliedColorU8, Stroke, Transform,
};

use crate::error::{AnnotatorError, Result};
use crate::geometry::Point;
use crate::shape::{Color4, Primitive, Shape};

/// The font the live canvas uses for text: egui's default proportional face.
pub fn default_font() -> Result<FontArc> {
    let defs = egui::FontDefinitions::default();
    let name = defs
        .families
        .get(&egui::FontFamily::Proportional)
        .and_then(|names| names.first())
        .ok_or_else(|| AnnotatorError::Font("no proportional font family".into()))?;
    let data = defs
        .font_data
        .get(name)
        .ok_or_else(|| AnnotatorError::Font(format!("missing font data for {name}")))?;
    FontArc::try_from_vec(data.font.to_vec()).map_err(|e| AnnotatorError::Font(e.to_string()))
}

pub struct Rasterizer {
    font: FontArc,
}

impl Rasterizer {
    pub fn new() -> Result<Self> {
        Ok(Self::with_font(default_font()?))
    }

    pub fn with_font(font: FontArc) -> Self {
        Self { font }
    }

    /// Composites `shapes` in order over `base` on a white background.
    ///
    /// The result has the size of `base`; anything drawn outside it is cropped.
    pub fn flatten(&self, base: &RgbaImage, shapes: &[Shape]) -> Result<RgbaImage> {
        let (w, h) = base.dimensions();
        let mut pixmap = Pixmap::new(w, h)
            .ok_or_else(|| AnnotatorError::Raster(format!("invalid canvas size {w}x{h}")))?;
        pixmap.fill(Color::WHITE);

        let base_pixmap = pixmap_from_image(base)?;
        pixmap.draw_pixmap(
            0,
            0,
            base_pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        for shape in shapes {
            for primitive in shape.primitives() {
                self.draw(&mut pixmap, &primitive);
            }
        }
        tracing::debug!(width = w, height = h, shapes = shapes.len(), "flattened");
        image_from_pixmap(&pixmap)
    }

    fn draw(&self, pixmap: &mut Pixmap, primitive: &Primitive) {
        match primitive {
            Primitive::Path {
                points,
                closed,
                width,
                color,
            } => stroke_polyline(pixmap, points, *closed, *width, *color),
            Primitive::Dot {
                center,
                diameter,
                color,
            } => fill_dot(pixmap, *center, *diameter, *color),
            Primitive::Text {
                origin,
                text,
                pixel_size,
                color,
            } => self.draw_text(pixmap, *origin, text, *pixel_size, *color),
        }
    }

    fn draw_text(&self, pixmap: &mut Pixmap, origin: Point, text: &str, size: f32, color: Color4) {
        let scaled = self.font.as_scaled(size);
        let baseline = origin.y + scaled.ascent();
        let mut x = origin.x;
        let mut prev = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = prev {
                x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(size, ab_glyph::point(x, baseline));
            x += scaled.h_advance(id);
            prev = Some(id);

            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let px = bounds.min.x as i32 + gx as i32;
                    let py = bounds.min.y as i32 + gy as i32;
                    blend_pixel(pixmap, px, py, color, coverage);
                });
            }
        }
    }
}

fn stroke_polyline(pixmap: &mut Pixmap, points: &[Point], closed: bool, width: f32, color: Color4) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    if closed {
        pb.close();
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let stroke = Stroke {
        width,
        line_cap: LineCap::Butt,
        line_join: LineJoin::Miter,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &solid_paint(color), &stroke, Transform::identity(), None);
}

fn fill_dot(pixmap: &mut Pixmap, center: Point, diameter: f32, color: Color4) {
    let Some(path) = PathBuilder::from_circle(center.x, center.y, diameter * 0.5) else {
        return;
    };
    pixmap.fill_path(
        &path,
        &solid_paint(color),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
}

fn solid_paint(color: Color4) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// Source-over blend of `color` at `coverage` into one premultiplied pixel.
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: Color4, coverage: f32) {
    let (w, h) = (pixmap.width(), pixmap.height());
    if x < 0 || y < 0 || x as u32 >= w || y as u32 >= h {
        return;
    }
    let idx = (y as u32 * w + x as u32) as usize;
    let [r, g, b, a] = color.to_rgba8();
    let alpha = a as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    let inv = 1.0 - alpha;

    let dst = pixmap.pixels()[idx];
    let mix = |s: u8, d: u8| (s as f32 * alpha + d as f32 * inv).round().min(255.0) as u8;
    let out = PremultipliedColorU8::from_rgba(
        mix(r, dst.red()),
        mix(g, dst.green()),
        mix(b, dst.blue()),
        mix(255, dst.alpha()),
    );
    if let Some(out) = out {
        pixmap.pixels_mut()[idx] = out;
    }
}

fn pixmap_from_image(img: &RgbaImage) -> Result<Pixmap> {
    let (w, h) = img.dimensions();
    let mut pixmap = Pixmap::new(w, h)
        .ok_or_else(|| AnnotatorError::Raster(format!("invalid image size {w}x{h}")))?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

fn image_from_pixmap(pixmap: &Pixmap) -> Result<RgbaImage> {
    let raw: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), raw)
        .ok_or_else(|| AnnotatorError::Raster("pixel buffer size mismatch".into()))
}
