//! Placed annotations and the drawing primitives they render to.

use crate::geometry::{self, axis_snap, Point, Rect};

pub const ELLIPSE_STROKE: f32 = 3.0;
pub const ARROW_STROKE: f32 = 3.0;
pub const GUIDELINE_STROKE: f32 = 2.0;
pub const RECTANGLE_STROKE: f32 = 1.0;
pub const TEXT_PIXEL_SIZE: f32 = 30.0;

pub const ARROW_HEAD_LENGTH: f32 = 20.0;
/// Degrees between the shaft and each side of the head.
pub const ARROW_HEAD_ANGLE: f32 = 15.0;

/// Dash on/off lengths for guidelines: a 4:2 pattern scaled by the pen width.
pub const GUIDELINE_DASH: [f32; 2] = [4.0 * GUIDELINE_STROKE, 2.0 * GUIDELINE_STROKE];

const ELLIPSE_SEGMENTS: usize = 64;

// ── Color ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color4 {
    pub const RED: Color4 = Color4::new(1.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color4 = Color4::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [c(self.r), c(self.g), c(self.b), c(self.a)]
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl Default for Color4 {
    fn default() -> Self {
        Self::RED
    }
}

// ── Tool ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    #[default]
    Ellipse,
    Arrow,
    Guideline,
    Rectangle,
    Text,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::Ellipse,
        Tool::Arrow,
        Tool::Guideline,
        Tool::Rectangle,
        Tool::Text,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Ellipse => "Ellipse",
            Tool::Arrow => "Arrow",
            Tool::Guideline => "Guideline",
            Tool::Rectangle => "Rectangle",
            Tool::Text => "Text",
        }
    }

    /// Whether a press with this tool starts a drag (everything except text).
    pub fn drags(self) -> bool {
        self != Tool::Text
    }
}

// ── Shape ───────────────────────────────────────────────────────────────────

/// A placed annotation. Color is captured when the shape is created.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Ellipse {
        bounds: Rect,
        color: Color4,
    },
    Arrow {
        from: Point,
        to: Point,
        color: Color4,
    },
    /// `to` is already axis-snapped.
    Guideline {
        from: Point,
        to: Point,
        color: Color4,
    },
    Rectangle {
        bounds: Rect,
        color: Color4,
    },
    Text {
        position: Point,
        text: String,
        color: Color4,
    },
}

impl Shape {
    /// The candidate shape for a drag from `anchor` to `current`. Text never drags, so `None`.
    pub fn from_drag(tool: Tool, anchor: Point, current: Point, color: Color4) -> Option<Shape> {
        let shape = match tool {
            Tool::Ellipse => Shape::Ellipse {
                bounds: Rect::from_points(anchor, current),
                color,
            },
            Tool::Arrow => Shape::Arrow {
                from: anchor,
                to: current,
                color,
            },
            Tool::Guideline => Shape::Guideline {
                from: anchor,
                to: axis_snap(anchor, current),
                color,
            },
            Tool::Rectangle => Shape::Rectangle {
                bounds: Rect::from_points(anchor, current),
                color,
            },
            Tool::Text => return None,
        };
        Some(shape)
    }

    pub fn text(position: Point, text: impl Into<String>, color: Color4) -> Shape {
        Shape::Text {
            position,
            text: text.into(),
            color,
        }
    }

    pub fn tool(&self) -> Tool {
        match self {
            Shape::Ellipse { .. } => Tool::Ellipse,
            Shape::Arrow { .. } => Tool::Arrow,
            Shape::Guideline { .. } => Tool::Guideline,
            Shape::Rectangle { .. } => Tool::Rectangle,
            Shape::Text { .. } => Tool::Text,
        }
    }

    pub fn color(&self) -> Color4 {
        match self {
            Shape::Ellipse { color, .. }
            | Shape::Arrow { color, .. }
            | Shape::Guideline { color, .. }
            | Shape::Rectangle { color, .. }
            | Shape::Text { color, .. } => *color,
        }
    }

    /// Pen width in scene units, or `None` for text.
    pub fn stroke_width(&self) -> Option<f32> {
        match self {
            Shape::Ellipse { .. } => Some(ELLIPSE_STROKE),
            Shape::Arrow { .. } => Some(ARROW_STROKE),
            Shape::Guideline { .. } => Some(GUIDELINE_STROKE),
            Shape::Rectangle { .. } => Some(RECTANGLE_STROKE),
            Shape::Text { .. } => None,
        }
    }

    /// Everything needed to draw this shape, in scene coordinates.
    ///
    /// The live canvas and the exporter both draw exactly this list, so curve tessellation and
    /// dashing happen here and nowhere else.
    pub fn primitives(&self) -> Vec<Primitive> {
        let width = self.stroke_width().unwrap_or_default();
        match self {
            Shape::Ellipse { bounds, color } => vec![Primitive::stroke(
                geometry::ellipse_points(bounds, ELLIPSE_SEGMENTS),
                true,
                width,
                *color,
            )],
            Shape::Arrow { from, to, color } => {
                let [left, right] =
                    geometry::arrow_head(*from, *to, ARROW_HEAD_LENGTH, ARROW_HEAD_ANGLE);
                vec![
                    Primitive::stroke(vec![*from, *to], false, width, *color),
                    Primitive::stroke(vec![*to, left, right], true, width, *color),
                ]
            }
            // Dashes run from the snapped end back to the anchor.
            Shape::Guideline { from, to, color } => {
                let [dash, gap] = GUIDELINE_DASH;
                geometry::dash_segments(*to, *from, dash, gap)
                    .into_iter()
                    .map(|[a, b]| Primitive::stroke(vec![a, b], false, width, *color))
                    .collect()
            }
            Shape::Rectangle { bounds, color } => vec![Primitive::stroke(
                bounds.corners().to_vec(),
                true,
                width,
                *color,
            )],
            Shape::Text {
                position,
                text,
                color,
            } => vec![Primitive::Text {
                origin: *position,
                text: text.clone(),
                pixel_size: TEXT_PIXEL_SIZE,
                color: *color,
            }],
        }
    }
}

/// A backend-neutral drawing command in scene coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Stroked polyline; `closed` joins the last point back to the first.
    Path {
        points: Vec<Point>,
        closed: bool,
        width: f32,
        color: Color4,
    },
    /// Filled disc, drawn where a stroke collapsed onto a single point.
    Dot {
        center: Point,
        diameter: f32,
        color: Color4,
    },
    /// Single line of text whose top-left corner sits at `origin`.
    Text {
        origin: Point,
        text: String,
        pixel_size: f32,
        color: Color4,
    },
}

impl Primitive {
    /// A stroked path, or a pen-sized dot when every point coincides.
    fn stroke(points: Vec<Point>, closed: bool, width: f32, color: Color4) -> Primitive {
        match points.first().copied() {
            Some(first) if points.iter().all(|p| *p == first) => Primitive::Dot {
                center: first,
                diameter: width,
                color,
            },
            _ => Primitive::Path {
                points,
                closed,
                width,
                color,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point;

    #[test]
    fn ellipse_bounds_are_order_independent() {
        let a = Shape::from_drag(Tool::Ellipse, point(50.0, 50.0), point(10.0, 10.0), Color4::RED);
        let b = Shape::from_drag(Tool::Ellipse, point(10.0, 10.0), point(50.0, 50.0), Color4::RED);
        assert_eq!(a, b);
        assert_eq!(
            a,
            Some(Shape::Ellipse {
                bounds: Rect::from_points(point(10.0, 10.0), point(50.0, 50.0)),
                color: Color4::RED,
            })
        );
    }

    #[test]
    fn text_tool_has_no_drag_shape() {
        assert!(Shape::from_drag(Tool::Text, Point::ZERO, point(5.0, 5.0), Color4::RED).is_none());
    }

    #[test]
    fn guideline_snaps_on_construction() {
        let shape =
            Shape::from_drag(Tool::Guideline, Point::ZERO, point(80.0, 5.0), Color4::RED).unwrap();
        assert_eq!(
            shape,
            Shape::Guideline {
                from: Point::ZERO,
                to: point(80.0, 0.0),
                color: Color4::RED,
            }
        );
    }

    #[test]
    fn guideline_primitives_are_dashes_along_snapped_line() {
        let shape =
            Shape::from_drag(Tool::Guideline, Point::ZERO, point(80.0, 5.0), Color4::RED).unwrap();
        let prims = shape.primitives();
        // 80 units with a 12-unit period.
        assert_eq!(prims.len(), 7);
        for prim in &prims {
            let Primitive::Path { points, width, .. } = prim else {
                panic!("guideline should only produce paths");
            };
            assert_eq!(*width, GUIDELINE_STROKE);
            assert!(points.iter().all(|p| p.y == 0.0 && p.x >= 0.0 && p.x <= 80.0));
        }
        let Primitive::Path { points, .. } = &prims[0] else {
            unreachable!()
        };
        assert_eq!(points[0], point(80.0, 0.0));
    }

    #[test]
    fn arrow_has_shaft_and_closed_head() {
        let shape =
            Shape::from_drag(Tool::Arrow, point(0.0, 0.0), point(100.0, 0.0), Color4::RED).unwrap();
        let prims = shape.primitives();
        assert_eq!(prims.len(), 2);
        let Primitive::Path { points, closed, width, .. } = &prims[1] else {
            panic!("expected head path");
        };
        assert!(*closed);
        assert_eq!(*width, ARROW_STROKE);
        assert_eq!(points[0], point(100.0, 0.0));
        let back = 100.0 - 20.0 * 15f32.to_radians().cos();
        assert!((points[1].x - back).abs() < 1e-3);
        assert!((points[1].y + points[2].y).abs() < 1e-4);
    }

    #[test]
    fn degenerate_shapes_become_pen_sized_dots() {
        let p = point(7.0, 7.0);
        for tool in Tool::ALL.into_iter().filter(|t| t.drags()) {
            let shape = Shape::from_drag(tool, p, p, Color4::RED).unwrap();
            let prims = shape.primitives();
            assert!(!prims.is_empty(), "{tool:?}");
            for prim in prims {
                assert_eq!(
                    prim,
                    Primitive::Dot {
                        center: p,
                        diameter: shape.stroke_width().unwrap(),
                        color: Color4::RED,
                    },
                    "{tool:?}"
                );
            }
        }
    }

    #[test]
    fn flat_rectangle_stays_a_path() {
        let shape =
            Shape::from_drag(Tool::Rectangle, point(0.0, 5.0), point(30.0, 5.0), Color4::RED)
                .unwrap();
        let prims = shape.primitives();
        assert_eq!(prims.len(), 1);
        assert!(matches!(&prims[0], Primitive::Path { points, .. } if points.len() == 4));
    }

    #[test]
    fn stroke_widths_per_variant() {
        let c = Color4::RED;
        let r = Rect::from_points(Point::ZERO, point(20.0, 10.0));
        assert_eq!(Shape::Ellipse { bounds: r, color: c }.stroke_width(), Some(3.0));
        assert_eq!(Shape::Rectangle { bounds: r, color: c }.stroke_width(), Some(1.0));
        let shapes = [
            Shape::Ellipse { bounds: r, color: c },
            Shape::Rectangle { bounds: r, color: c },
        ];
        for shape in shapes {
            let Primitive::Path { width, .. } = &shape.primitives()[0] else {
                panic!("expected a path");
            };
            assert_eq!(Some(*width), shape.stroke_width());
        }
        assert_eq!(Shape::text(Point::ZERO, "hi", c).stroke_width(), None);
        assert_eq!(Shape::text(Point::ZERO, "hi", c).tool(), Tool::Text);
    }

    #[test]
    fn color_byte_conversion() {
        assert_eq!(Color4::RED.to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(Color4::new(0.0, 1.0, 0.0, 0.5).to_rgba8(), [0, 255, 0, 128]);
        assert_eq!(Color4::from_array([0.0, 1.0, 0.0, 1.0]).to_array(), [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(Color4::default(), Color4::RED);
    }
}
