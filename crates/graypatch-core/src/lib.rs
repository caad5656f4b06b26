//! Graypatch Core — domain layer for patch-based white balance.
//!
//! This crate contains the viewport math, selection handling, region
//! sampling, gain estimation, and the interaction state machine that wires
//! them together. No GUI or framework dependencies: the embedding shell
//! feeds it an abstract input-event stream and reads back a preview buffer.

pub mod balance;
pub mod color;
pub mod error;
pub mod events;
pub mod image;
pub mod sampler;
pub mod selection;
pub mod session;
pub mod viewport;

// Re-exports for convenience.
pub use balance::{GainVector, apply_gains, correct_white_balance};
pub use color::ccm::Ccm;
pub use error::BalanceError;
pub use events::{InputEvent, PointerButton};
pub use image::{PreviewImage, SourceImage};
pub use selection::SelectionRect;
pub use session::{Session, SessionConfig};
pub use viewport::Viewport;
