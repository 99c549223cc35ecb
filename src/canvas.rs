//! Screen/scene mapping and the live-preview slot.

use crate::geometry::{point, vector, Point, Rect, Vector};
use crate::shape::Shape;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;

/// Pan/zoom view of the image inside a widget viewport.
///
/// The image center sits at the viewport center shifted by `pan`; one scene unit spans `zoom`
/// screen units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub image_size: (f32, f32),
    pub pan: Vector,
    pub zoom: f32,
}

impl ViewTransform {
    pub fn new(image_size: (f32, f32)) -> Self {
        Self {
            image_size,
            pan: Vector::ZERO,
            zoom: 1.0,
        }
    }

    /// Centers the image and scales it to fit `viewport`, keeping aspect ratio.
    pub fn fit(&mut self, viewport: Rect) {
        let (w, h) = self.image_size;
        self.pan = Vector::ZERO;
        if w <= 0.0 || h <= 0.0 || viewport.width() <= 0.0 || viewport.height() <= 0.0 {
            self.zoom = 1.0;
            return;
        }
        self.zoom = (viewport.width() / w)
            .min(viewport.height() / h)
            .clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Convert scene coords to screen coords
    pub fn to_screen(&self, viewport: Rect, scene: Point) -> Point {
        let center = viewport.center();
        let (w, h) = self.image_size;
        center + self.pan + vector(scene.x - w * 0.5, scene.y - h * 0.5) * self.zoom
    }

    /// Convert screen coords to scene coords
    pub fn to_scene(&self, viewport: Rect, screen: Point) -> Point {
        let rel = screen - viewport.center() - self.pan;
        let (w, h) = self.image_size;
        point(rel.x / self.zoom + w * 0.5, rel.y / self.zoom + h * 0.5)
    }

    pub fn image_rect_on_screen(&self, viewport: Rect) -> Rect {
        let (w, h) = self.image_size;
        Rect::from_points(
            self.to_screen(viewport, Point::ZERO),
            self.to_screen(viewport, point(w, h)),
        )
    }

    pub fn pan_by(&mut self, delta: Vector) {
        self.pan = self.pan + delta;
    }

    /// Multiplies the zoom by `factor`, keeping the scene point under `cursor` fixed.
    pub fn zoom_about(&mut self, viewport: Rect, cursor: Point, factor: f32) {
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let cursor_rel = cursor - viewport.center() - self.pan;
        self.pan = self.pan + cursor_rel * (1.0 - new_zoom / self.zoom);
        self.zoom = new_zoom;
    }
}

/// Holds at most one not-yet-committed shape. Setting a new preview discards the old one.
#[derive(Clone, Debug, Default)]
pub struct PreviewSlot {
    current: Option<Shape>,
}

impl PreviewSlot {
    /// Replaces the preview, returning the one it displaced.
    pub fn set(&mut self, shape: Shape) -> Option<Shape> {
        self.current.replace(shape)
    }

    pub fn take(&mut self) -> Option<Shape> {
        self.current.take()
    }

    pub fn get(&self) -> Option<&Shape> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}
