//! Abstract input events for the interaction layer.
//!
//! The session is driven by a toolkit-independent event stream so that the
//! state machine can be exercised without any windowing backend. The
//! embedding shell translates its native pointer/keyboard/wheel events into
//! these types.

use serde::{Deserialize, Serialize};

use crate::viewport::ScreenPoint;

/// Pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// An input event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// A pointer button was pressed.
    PointerDown { button: PointerButton, pos: ScreenPoint },
    /// The pointer moved.
    PointerMove { pos: ScreenPoint },
    /// A pointer button was released.
    PointerUp { button: PointerButton, pos: ScreenPoint },
    /// Wheel rotation at a pointer position. Positive delta zooms in.
    Wheel { delta: f32, pos: ScreenPoint },
    /// The selection modifier key went down.
    ModifierDown,
    /// The selection modifier key went up.
    ModifierUp,
    /// The viewport was resized.
    ViewportResized { width: f32, height: f32 },
}

/// Cursor shape the embedding shell should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorShape {
    /// Default pointer.
    #[default]
    Arrow,
    /// Selection modifier held: crosshair over the image.
    Crosshair,
    /// Pan drag in progress.
    ClosedHand,
}
