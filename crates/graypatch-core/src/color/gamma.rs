//! Approximate gamma companding.
//!
//! Display-referred 8-bit values are decoded toward linear light by squaring
//! and re-encoded by taking the square root — a deliberately cheap stand-in
//! for a gamma-2.2 transfer curve. The gain math runs entirely in the
//! decoded (approximately linear) domain.

/// Decode a display-referred value in [0, 1] toward linear light.
#[inline]
pub fn decode(encoded: f32) -> f32 {
    encoded * encoded
}

/// Encode a linear value in [0, 1] back to display-referred.
#[inline]
pub fn encode(linear: f32) -> f32 {
    linear.sqrt()
}

/// Normalize an 8-bit storage value to [0, 1].
#[inline]
pub fn from_u8(v: u8) -> f32 {
    f32::from(v) / 255.0
}

/// Convert a [0, 1] value back to the 8-bit storage domain.
#[inline]
pub fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0) as u8
}
