//! Region sampling — per-channel means over a rectangle of a linear buffer.

use crate::error::BalanceError;
use crate::selection::SelectionRect;

/// Added to each final mean as a division-by-zero guard for the gain
/// ratios computed downstream.
pub const MEAN_EPSILON: f32 = 0.001;

/// Arithmetic mean of each channel over `rect`, channels in R, G, B order
/// with f64 accumulation, plus [`MEAN_EPSILON`] on each result.
///
/// `pixels` is a row-major buffer of the given width. The rectangle must
/// already lie within the buffer — that is the caller's contract, and
/// violating it returns [`BalanceError::OutOfBounds`]. A zero-area
/// rectangle returns [`BalanceError::InvalidSelection`].
pub fn channel_means(
    pixels: &[[f32; 3]],
    width: u32,
    rect: SelectionRect,
) -> Result<[f32; 3], BalanceError> {
    if rect.area() == 0 {
        return Err(BalanceError::InvalidSelection);
    }
    let height = (pixels.len() / width.max(1) as usize) as u32;
    if !rect.fits_within(width, height) {
        return Err(BalanceError::OutOfBounds {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            image_width: width,
            image_height: height,
        });
    }

    let mut sum = [0.0_f64; 3];
    for row in rect.y..rect.bottom() {
        let start = row as usize * width as usize + rect.x as usize;
        for px in &pixels[start..start + rect.width as usize] {
            for c in 0..3 {
                sum[c] += f64::from(px[c]);
            }
        }
    }

    let count = rect.area() as f64;
    Ok([
        (sum[0] / count) as f32 + MEAN_EPSILON,
        (sum[1] / count) as f32 + MEAN_EPSILON,
        (sum[2] / count) as f32 + MEAN_EPSILON,
    ])
}
