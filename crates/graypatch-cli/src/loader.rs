//! Image loading and saving for the CLI.

use std::path::Path;

use graypatch_core::{PreviewImage, SourceImage};

/// Load an image from disk into the pipeline's source format.
///
/// Supports common formats via the `image` crate; everything is converted
/// to 8-bit RGB.
pub fn load_source(path: &Path) -> Result<SourceImage, ImageIoError> {
    let img = image::open(path).map_err(ImageIoError::Decode)?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let pixels: Vec<[u8; 3]> = rgb.pixels().map(|p| p.0).collect();

    SourceImage::new(width, height, pixels).ok_or(ImageIoError::Dimensions { width, height })
}

/// Write the corrected preview back to disk; format follows the extension.
pub fn save_preview(preview: &PreviewImage, path: &Path) -> Result<(), ImageIoError> {
    let raw: Vec<u8> = preview.pixels().iter().flatten().copied().collect();
    let buffer = image::RgbImage::from_raw(preview.width(), preview.height(), raw)
        .ok_or(ImageIoError::Dimensions {
            width: preview.width(),
            height: preview.height(),
        })?;
    buffer.save(path).map_err(ImageIoError::Encode)
}

/// Errors that can occur while reading or writing image files.
#[derive(Debug, thiserror::Error)]
pub enum ImageIoError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("inconsistent image dimensions {width}x{height}")]
    Dimensions { width: u32, height: u32 },
}
