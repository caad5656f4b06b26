//! Gain estimation from sampled patch means.

use crate::error::BalanceError;

use super::GainVector;

/// Patch means above this are too close to clipping to be a trustworthy
/// gray reference.
pub const SATURATION_THRESHOLD: f32 = 0.85;

/// Derive normalized per-channel gains from linear-space patch means.
///
/// Red and blue gains are ratios against the green mean; green is the
/// reference at 1.0. All three are then divided by their minimum so the
/// smallest gain is exactly 1.0.
///
/// Fails with [`BalanceError::Saturated`] when any channel mean exceeds
/// [`SATURATION_THRESHOLD`].
pub fn estimate_gains(means: [f32; 3]) -> Result<GainVector, BalanceError> {
    let max_mean = means[0].max(means[1]).max(means[2]);
    if max_mean > SATURATION_THRESHOLD {
        return Err(BalanceError::Saturated {
            mean: max_mean,
            threshold: SATURATION_THRESHOLD,
        });
    }

    let gain_r = means[1] / means[0];
    let gain_b = means[1] / means[2];
    let gain_g = 1.0_f32;

    let min_gain = gain_r.min(gain_b).min(gain_g);
    Ok(GainVector {
        r: gain_r / min_gain,
        g: gain_g / min_gain,
        b: gain_b / min_gain,
    })
}
