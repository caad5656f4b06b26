//! Error types for the white-balance pipeline.

/// Errors that can occur while sampling a region or computing gains.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BalanceError {
    /// The selection has zero area or is below the minimum size.
    #[error("selection is empty or below the minimum size")]
    InvalidSelection,

    /// The selection extends past the image. The interaction layer clamps
    /// selections to the image, so hitting this is a caller bug.
    #[error("selection {x},{y} {width}x{height} exceeds image {image_width}x{image_height}")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    /// A sampled channel mean exceeds the saturation threshold; the patch is
    /// too bright to be a usable gray reference.
    #[error("sampled patch is too saturated (channel mean {mean:.3} > {threshold:.2})")]
    Saturated { mean: f32, threshold: f32 },

    /// The color correction matrix is not invertible. The CCM is a fixed
    /// configuration value, so this is a startup fault, not a runtime one.
    #[error("color correction matrix is singular (|det| = {det:.2e})")]
    SingularMatrix { det: f64 },
}
