//! Color correction matrix (CCM).
//!
//! A fixed 3×3 linear transform between sensor-referred and display-referred
//! RGB, applied in both directions around the gain computation: the inverse
//! maps the decoded image back toward sensor color before sampling, the
//! forward matrix restores display color afterwards.
//!
//! The matrix is a validated, load-time-configurable parameter: the inverse
//! is precomputed at construction and a near-zero determinant is rejected
//! there, so per-pixel code never has to re-check invertibility.

use crate::error::BalanceError;

/// Determinant magnitude below which the matrix is treated as singular.
const DET_EPSILON: f64 = 1e-6;

/// A 3×3 color correction matrix with its precomputed inverse.
///
/// Rows act on column vectors: `out = M · rgb`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ccm {
    forward: [[f32; 3]; 3],
    inverse: [[f32; 3]; 3],
}

impl Ccm {
    /// Build a CCM from its forward matrix, computing the inverse.
    ///
    /// Fails with [`BalanceError::SingularMatrix`] when the determinant
    /// magnitude is below 1e-6.
    pub fn new(forward: [[f32; 3]; 3]) -> Result<Self, BalanceError> {
        let m = to_f64(forward);
        let det = det3(m);
        if det.abs() < DET_EPSILON {
            return Err(BalanceError::SingularMatrix { det });
        }

        // Cofactor expansion; adjugate transposed over the determinant.
        let inv = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
            ],
        ];

        Ok(Self {
            forward,
            inverse: to_f32(inv),
        })
    }

    /// The forward matrix rows.
    pub fn forward(&self) -> &[[f32; 3]; 3] {
        &self.forward
    }

    /// Apply the forward matrix: sensor-referred → display-referred.
    #[inline]
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        mat3_vec3(&self.forward, rgb)
    }

    /// Apply the precomputed inverse: display-referred → sensor-referred.
    #[inline]
    pub fn apply_inverse(&self, rgb: [f32; 3]) -> [f32; 3] {
        mat3_vec3(&self.inverse, rgb)
    }
}

impl Default for Ccm {
    /// A middle-of-the-road generic matrix, hand-tuned rather than derived
    /// from any particular sensor. Invertible by construction.
    fn default() -> Self {
        Self::new([
            [1.8, -0.8, 0.0],
            [-0.4, 1.8, -0.4],
            [0.0, -0.8, 1.8],
        ])
        .unwrap_or_else(|_| unreachable!("default CCM is invertible"))
    }
}

#[inline]
fn mat3_vec3(m: &[[f32; 3]; 3], v: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn det3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

fn to_f64(m: [[f32; 3]; 3]) -> [[f64; 3]; 3] {
    m.map(|row| row.map(f64::from))
}

fn to_f32(m: [[f64; 3]; 3]) -> [[f32; 3]; 3] {
    m.map(|row| row.map(|v| v as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    #[test]
    fn test_identity_inverse_is_identity() {
        let ccm = Ccm::new(IDENTITY).unwrap();
        let v = [0.2, 0.5, 0.8];
        assert_eq!(ccm.apply(v), v);
        assert_eq!(ccm.apply_inverse(v), v);
    }

    #[test]
    fn test_singular_matrix_rejected() {
        let singular = [[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 0.0]];
        match Ccm::new(singular) {
            Err(BalanceError::SingularMatrix { det }) => assert!(det.abs() < 1e-6),
            other => panic!("expected SingularMatrix, got {other:?}"),
        }
    }

    #[test]
    fn test_forward_then_inverse_round_trips() {
        let ccm = Ccm::default();
        let v = [0.3, 0.6, 0.1];
        let back = ccm.apply_inverse(ccm.apply(v));
        for c in 0..3 {
            assert!(
                (back[c] - v[c]).abs() < EPSILON,
                "channel {c}: {} vs {}",
                back[c],
                v[c]
            );
        }
    }

    #[test]
    fn test_default_ccm_preserves_gray() {
        // Rows of the default matrix sum to 1.0, so neutral values pass through.
        let ccm = Ccm::default();
        let out = ccm.apply([0.5, 0.5, 0.5]);
        for c in 0..3 {
            assert!((out[c] - 0.5).abs() < EPSILON, "channel {c}: {}", out[c]);
        }
    }
}
