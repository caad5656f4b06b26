//! Color math — approximate gamma companding and the color correction matrix.

pub mod ccm;
pub mod gamma;
