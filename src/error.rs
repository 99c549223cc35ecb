use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = AnnotatorError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AnnotatorError {
    #[error("failed to load image {}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("font unavailable: {0}")]
    Font(String),

    #[error("cannot rasterize: {0}")]
    Raster(String),

    #[error("failed to write {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("clipboard error")]
    Clipboard(#[from] arboard::Error),
}
