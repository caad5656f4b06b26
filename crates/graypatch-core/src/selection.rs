//! Selection rectangle in original-image pixel coordinates.

use serde::{Deserialize, Serialize};

use crate::viewport::ImagePoint;

/// Minimum selection extent, in image pixels, on each axis. Anything
/// smaller is rejected as an accidental click.
pub const MIN_SELECTION_SIZE: u32 = 10;

/// An axis-aligned rectangle in original-image pixel coordinates,
/// normalized to a min-corner plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SelectionRect {
    /// Normalize two drag endpoints into a min-corner rectangle. Endpoints
    /// may arrive in any order; negative coordinates clamp to the image
    /// origin.
    pub fn from_corners(a: ImagePoint, b: ImagePoint) -> Self {
        let x0 = a.x.min(b.x).max(0);
        let y0 = a.y.min(b.y).max(0);
        let x1 = a.x.max(b.x).max(0);
        let y1 = a.y.max(b.y).max(0);
        Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        }
    }

    /// Whether the rectangle meets the minimum size on both axes.
    pub fn is_valid(&self) -> bool {
        self.width >= MIN_SELECTION_SIZE && self.height >= MIN_SELECTION_SIZE
    }

    /// Number of pixels covered.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether the rectangle lies entirely within an image of the given
    /// dimensions.
    pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        self.right() <= image_width && self.bottom() <= image_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_normalize_in_any_order() {
        let a = ImagePoint { x: 50, y: 10 };
        let b = ImagePoint { x: 20, y: 40 };
        let rect = SelectionRect::from_corners(a, b);
        assert_eq!(rect, SelectionRect { x: 20, y: 10, width: 30, height: 30 });
        assert_eq!(rect, SelectionRect::from_corners(b, a));
    }

    #[test]
    fn test_negative_coordinates_clamp_to_origin() {
        let rect = SelectionRect::from_corners(ImagePoint { x: -5, y: -3 }, ImagePoint { x: 15, y: 12 });
        assert_eq!(rect, SelectionRect { x: 0, y: 0, width: 15, height: 12 });
    }

    #[test]
    fn test_minimum_size_boundary() {
        let narrow = SelectionRect { x: 0, y: 0, width: 9, height: 50 };
        assert!(!narrow.is_valid());
        let minimal = SelectionRect { x: 0, y: 0, width: 10, height: 10 };
        assert!(minimal.is_valid());
    }

    #[test]
    fn test_fits_within_is_exclusive() {
        let rect = SelectionRect { x: 90, y: 90, width: 10, height: 10 };
        assert!(rect.fits_within(100, 100));
        assert!(!rect.fits_within(99, 100));
    }
}
