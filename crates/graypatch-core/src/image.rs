//! Image representation for the white-balance pipeline.
//!
//! Two distinct buffer types keep the no-compounding invariant structural:
//! gain estimation always reads the pristine [`SourceImage`], and corrections
//! always land in a freshly built [`PreviewImage`]. Neither is ever mutated
//! in place.

use std::fmt;

/// The immutable source image: RGB, 8-bit, row-major, loaded once per
/// session. There is no public mutation API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl SourceImage {
    /// Build a source image from row-major RGB pixels.
    ///
    /// Returns `None` when the buffer length does not match the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self { width, height, pixels })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGB pixel data.
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }
}

impl fmt::Display for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} RGB", self.width, self.height)
    }
}

/// A display buffer, replaced wholesale whenever a correction is applied.
/// Readers see either the prior buffer or the fully corrected one, never a
/// partially updated state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl PreviewImage {
    pub(crate) fn from_pixels(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Self {
        debug_assert_eq!(pixels.len(), (width as usize) * (height as usize));
        Self { width, height, pixels }
    }

    /// An uncorrected preview showing the source image as-is.
    pub fn from_source(source: &SourceImage) -> Self {
        Self {
            width: source.width(),
            height: source.height(),
            pixels: source.pixels().to_vec(),
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGB pixel data.
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }
}
