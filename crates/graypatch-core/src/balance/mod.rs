//! White balance from a gray reference patch.
//!
//! The gray-world assumption, applied to a user-chosen patch rather than the
//! whole frame: the patch's average color should be neutral, so any
//! deviation is a color cast correctable with per-channel gains. Gains are
//! computed in approximately linear, sensor-referred space — decoded by the
//! gamma approximation and mapped through the CCM inverse — then applied to
//! the entire buffer before transforming back for display.

pub mod apply;
pub mod gains;

use serde::{Deserialize, Serialize};

use crate::color::ccm::Ccm;
use crate::color::gamma;
use crate::error::BalanceError;
use crate::image::{PreviewImage, SourceImage};
use crate::sampler;
use crate::selection::SelectionRect;

pub use apply::apply_gains;
pub use gains::estimate_gains;

/// Per-channel white-balance gains. After normalization the smallest gain
/// is exactly 1.0, so gains only ever brighten relative to the reference
/// channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainVector {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl GainVector {
    /// The identity correction.
    pub const NEUTRAL: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    /// The smallest of the three gains; 1.0 for any normalized vector.
    pub fn min(&self) -> f32 {
        self.r.min(self.g).min(self.b)
    }
}

/// Estimate gains from `rect` and apply them across the whole of `source`.
///
/// This is the full gray-world pipeline in one synchronous call. It reads
/// only the pristine source, so repeated selections never compound
/// corrections. On success the corrected preview and the normalized gains
/// are returned together; on any error no buffer is produced.
pub fn correct_white_balance(
    source: &SourceImage,
    ccm: &Ccm,
    rect: SelectionRect,
) -> Result<(PreviewImage, GainVector), BalanceError> {
    let linear = decode_to_linear(source, ccm);
    let means = sampler::channel_means(&linear, source.width(), rect)?;
    let gains = gains::estimate_gains(means)?;

    tracing::info!(
        "patch means R={:.3} G={:.3} B={:.3}; gains R={:.3} G={:.3} B={:.3}",
        means[0],
        means[1],
        means[2],
        gains.r,
        gains.g,
        gains.b
    );

    let preview = apply::apply_to_linear(linear, source.width(), source.height(), ccm, gains);
    Ok((preview, gains))
}

/// Decode the whole image into approximately linear, sensor-referred space:
/// normalize, square, apply the CCM inverse, clip to [0, 1].
pub(crate) fn decode_to_linear(source: &SourceImage, ccm: &Ccm) -> Vec<[f32; 3]> {
    source
        .pixels()
        .iter()
        .map(|&[r, g, b]| {
            let decoded = [
                gamma::decode(gamma::from_u8(r)),
                gamma::decode(gamma::from_u8(g)),
                gamma::decode(gamma::from_u8(b)),
            ];
            clip01(ccm.apply_inverse(decoded))
        })
        .collect()
}

#[inline]
pub(crate) fn clip01(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(|v| v.clamp(0.0, 1.0))
}
