//! Drawing [`Primitive`]s onto the live egui canvas.

use crate::canvas::ViewTransform;
use crate::geometry::{point, Point, Rect};
use crate::shape::{Color4, Primitive, Shape};

pub fn to_pos2(p: Point) -> egui::Pos2 {
    egui::pos2(p.x, p.y)
}

pub fn from_pos2(p: egui::Pos2) -> Point {
    point(p.x, p.y)
}

pub fn from_egui_rect(r: egui::Rect) -> Rect {
    Rect::from_points(from_pos2(r.min), from_pos2(r.max))
}

pub fn to_egui_rect(r: Rect) -> egui::Rect {
    egui::Rect::from_min_max(to_pos2(r.min), to_pos2(r.max))
}

pub fn to_color32(c: Color4) -> egui::Color32 {
    let [r, g, b, a] = c.to_rgba8();
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// The egui shape for a stroked path primitive, mapped into screen space.
pub fn path_shape(
    view: &ViewTransform,
    viewport: Rect,
    points: &[Point],
    closed: bool,
    width: f32,
    color: Color4,
) -> egui::Shape {
    let screen: Vec<egui::Pos2> = points
        .iter()
        .map(|p| to_pos2(view.to_screen(viewport, *p)))
        .collect();
    let stroke = egui::Stroke::new(width * view.zoom, to_color32(color));
    if closed {
        egui::Shape::closed_line(screen, stroke)
    } else {
        egui::Shape::line(screen, stroke)
    }
}

pub fn dot_shape(
    view: &ViewTransform,
    viewport: Rect,
    center: Point,
    diameter: f32,
    color: Color4,
) -> egui::Shape {
    egui::Shape::circle_filled(
        to_pos2(view.to_screen(viewport, center)),
        diameter * 0.5 * view.zoom,
        to_color32(color),
    )
}

pub fn paint_primitive(
    painter: &egui::Painter,
    view: &ViewTransform,
    viewport: Rect,
    primitive: &Primitive,
) {
    match primitive {
        Primitive::Path {
            points,
            closed,
            width,
            color,
        } => {
            painter.add(path_shape(view, viewport, points, *closed, *width, *color));
        }
        Primitive::Dot {
            center,
            diameter,
            color,
        } => {
            painter.add(dot_shape(view, viewport, *center, *diameter, *color));
        }
        Primitive::Text {
            origin,
            text,
            pixel_size,
            color,
        } => {
            painter.text(
                to_pos2(view.to_screen(viewport, *origin)),
                egui::Align2::LEFT_TOP,
                text,
                egui::FontId::proportional(pixel_size * view.zoom),
                to_color32(*color),
            );
        }
    }
}

pub fn paint_shape(painter: &egui::Painter, view: &ViewTransform, viewport: Rect, shape: &Shape) {
    for primitive in shape.primitives() {
        paint_primitive(painter, view, viewport, &primitive);
    }
}
