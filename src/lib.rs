//! Annotate a raster image with ellipses, arrows, guidelines, rectangles and text, then flatten
//! the result into a bitmap for saving or copying.
//!
//! The drawing core ([`session`], [`shape`], [`store`], [`geometry`], [`canvas`]) has no UI
//! dependency and is driven by plain pointer and key calls; [`app`] wires it to eframe.

pub mod app;
pub mod canvas;
pub mod error;
pub mod export;
pub mod geometry;
pub mod paint;
pub mod raster;
pub mod session;
pub mod shape;
pub mod store;

pub use app::AnnotatorApp;
pub use error::{AnnotatorError, Result};
pub use raster::Rasterizer;
pub use session::{DrawingSession, EditorRequest, KeyChord, KeyCommand, PointerDown};
pub use shape::{Color4, Shape, Tool};
pub use store::AnnotationStore;
