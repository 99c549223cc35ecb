//! Scene-space vector math shared by shape construction, the live canvas and export.

use std::ops::{Add, Mul, Sub};

/// A position in scene (image pixel) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// A displacement between two [`Point`]s.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

pub const fn point(x: f32, y: f32) -> Point {
    Point { x, y }
}

pub const fn vector(x: f32, y: f32) -> Vector {
    Vector { x, y }
}

impl Point {
    pub const ZERO: Point = point(0.0, 0.0);

    pub fn distance(self, other: Point) -> f32 {
        (other - self).length()
    }
}

impl Vector {
    pub const ZERO: Vector = vector(0.0, 0.0);

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit vector with the same direction. A zero-length input yields the zero vector.
    pub fn normalized(self) -> Vector {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            vector(self.x / len, self.y / len)
        } else {
            Vector::ZERO
        }
    }

    /// Rotates by `degrees` in scene space (y grows downwards, so positive turns clockwise on
    /// screen).
    pub fn rotated(self, degrees: f32) -> Vector {
        let (sin, cos) = degrees.to_radians().sin_cos();
        vector(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Point) -> Vector {
        vector(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, rhs: Vector) -> Point {
        point(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vector> for Point {
    type Output = Point;

    fn sub(self, rhs: Vector) -> Point {
        point(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        vector(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        vector(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f32) -> Vector {
        vector(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle, always stored with `min <= max` on both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Rectangle spanning two opposite corners given in any order.
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            min: point(a.x.min(b.x), a.y.min(b.y)),
            max: point(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        point(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Corners clockwise on screen, starting top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            point(self.max.x, self.min.y),
            self.max,
            point(self.min.x, self.max.y),
        ]
    }
}

/// Constrains `to` so the segment from `from` runs purely horizontally or vertically.
///
/// Horizontal wins only when `|dx|` is strictly larger; ties go vertical.
pub fn axis_snap(from: Point, to: Point) -> Point {
    let d = to - from;
    if d.x.abs() > d.y.abs() {
        point(to.x, from.y)
    } else {
        point(from.x, to.y)
    }
}

/// The two outer corners of an arrow head at `to`.
///
/// The shaft direction is normalized, scaled to `length`, then rotated by `+angle` and `-angle`
/// degrees and subtracted from the tip. A zero-length shaft puts both corners on the tip.
pub fn arrow_head(from: Point, to: Point, length: f32, angle: f32) -> [Point; 2] {
    let shaft = (to - from).normalized() * length;
    [to - shaft.rotated(angle), to - shaft.rotated(-angle)]
}

/// Splits the segment `from -> to` into dash segments, starting with a dash at `from`.
///
/// A zero-length segment yields a single zero-length dash at `from`.
pub fn dash_segments(from: Point, to: Point, dash: f32, gap: f32) -> Vec<[Point; 2]> {
    let len = from.distance(to);
    if len <= 0.0 || dash <= 0.0 {
        return vec![[from, to]];
    }
    let dir = (to - from).normalized();
    let period = dash + gap.max(0.0);
    let mut segments = Vec::with_capacity((len / period).ceil() as usize + 1);
    let mut t = 0.0;
    while t < len {
        let end = (t + dash).min(len);
        segments.push([from + dir * t, from + dir * end]);
        t += period;
    }
    segments
}

/// `segments` points around the ellipse inscribed in `bounds`, starting at the rightmost point.
pub fn ellipse_points(bounds: &Rect, segments: usize) -> Vec<Point> {
    let c = bounds.center();
    let rx = bounds.width() * 0.5;
    let ry = bounds.height() * 0.5;
    let n = segments.max(3);
    (0..n)
        .map(|i| {
            let theta = i as f32 / n as f32 * std::f32::consts::TAU;
            point(c.x + rx * theta.cos(), c.y + ry * theta.sin())
        })
        .collect()
}
