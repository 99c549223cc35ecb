//! Image file and clipboard IO.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};

use crate::error::{AnnotatorError, Result};

/// Extensions offered by the save dialog.
pub const SAVE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|source| AnnotatorError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), width = img.width(), height = img.height(), "loaded image");
    Ok(img.to_rgba8())
}

/// Appends `.png` when `path` has no extension.
pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("png")
    }
}

/// Writes `image` as opaque RGB, picking the format from the extension. Returns the path written.
pub fn save_to_file(image: &RgbaImage, path: &Path) -> Result<PathBuf> {
    let path = with_default_extension(path);
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    rgb.save(&path).map_err(|source| AnnotatorError::Encode {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), "exported image");
    Ok(path)
}

/// Lazily opened system clipboard. The handle is kept so copied images outlive the call on
/// platforms where the owning process must stay alive.
#[derive(Default)]
pub struct ClipboardSink {
    clipboard: Option<arboard::Clipboard>,
}

impl ClipboardSink {
    pub fn copy_image(&mut self, image: &RgbaImage) -> Result<()> {
        let clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        let clipboard = self.clipboard.insert(clipboard);
        clipboard.set_image(arboard::ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: Cow::Borrowed(image.as_raw()),
        })?;
        tracing::info!(width = image.width(), height = image.height(), "copied image to clipboard");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        RgbaImage::from_pixel(8, 6, Rgba([10, 200, 30, 255]))
    }

    #[test]
    fn default_extension_only_when_missing() {
        assert_eq!(with_default_extension(Path::new("out")), PathBuf::from("out.png"));
        assert_eq!(with_default_extension(Path::new("out.jpg")), PathBuf::from("out.jpg"));
    }

    #[test]
    fn saves_png_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let written = save_to_file(&sample(), &dir.path().join("shot")).unwrap();
        assert_eq!(written.extension().unwrap(), "png");
        let back = load_image(&written).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn saves_jpeg_from_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let written = save_to_file(&sample(), &dir.path().join("shot.jpg")).unwrap();
        assert_eq!(load_image(&written).unwrap().dimensions(), (8, 6));
    }

    #[test]
    fn missing_image_is_a_load_error() {
        let err = load_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, AnnotatorError::ImageLoad { .. }));
    }

    #[test]
    fn unknown_extension_is_an_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_to_file(&sample(), &dir.path().join("shot.nope")).unwrap_err();
        assert!(matches!(err, AnnotatorError::Encode { .. }));
    }
}
