//! Gain application over a full buffer.

use crate::color::ccm::Ccm;
use crate::color::gamma;
use crate::image::{PreviewImage, SourceImage};

use super::{GainVector, clip01, decode_to_linear};

/// Apply a gain vector across the pristine source, producing a fresh
/// preview buffer.
///
/// Pure function: identical inputs always yield bit-identical outputs. It
/// reads only the source image — never an already-corrected preview — so
/// calling it repeatedly cannot compound corrections.
pub fn apply_gains(source: &SourceImage, ccm: &Ccm, gains: GainVector) -> PreviewImage {
    let linear = decode_to_linear(source, ccm);
    apply_to_linear(linear, source.width(), source.height(), ccm, gains)
}

/// The second half of the pipeline, over an already-decoded linear buffer:
/// per-channel gains with clipping, forward CCM with clipping, gamma
/// re-encode, back to 8-bit storage.
pub(crate) fn apply_to_linear(
    mut linear: Vec<[f32; 3]>,
    width: u32,
    height: u32,
    ccm: &Ccm,
    gains: GainVector,
) -> PreviewImage {
    for px in &mut linear {
        let gained = clip01([px[0] * gains.r, px[1] * gains.g, px[2] * gains.b]);
        *px = clip01(ccm.apply(gained));
    }

    let pixels = linear
        .into_iter()
        .map(|[r, g, b]| {
            [
                gamma::to_u8(gamma::encode(r)),
                gamma::to_u8(gamma::encode(g)),
                gamma::to_u8(gamma::encode(b)),
            ]
        })
        .collect();
    PreviewImage::from_pixels(width, height, pixels)
}
