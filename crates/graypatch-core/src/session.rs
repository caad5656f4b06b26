//! Interaction session — the input-event state machine.
//!
//! Owns the pristine source, the replaceable preview, and the viewport, and
//! advances an explicit state machine over the abstract event stream:
//!
//! ```text
//! Idle --pointer-down--------> Panning --pointer-up--> Idle
//! Idle --modifier-down-------> SelectingArmed --modifier-up--> Idle
//! SelectingArmed --pointer-down--> Selecting --pointer-up--> SelectingArmed
//! any  --wheel---------------> zoom; rect cleared
//! ```
//!
//! An accepted selection runs sampling, gain estimation, and full-buffer
//! application synchronously within the event turn. Recoverable failures
//! (too small, too saturated) clear the pending rectangle and leave the
//! preview byte-identical to its prior state.

use crate::balance::{self, GainVector};
use crate::color::ccm::Ccm;
use crate::error::BalanceError;
use crate::events::{CursorShape, InputEvent, PointerButton};
use crate::image::{PreviewImage, SourceImage};
use crate::selection::SelectionRect;
use crate::viewport::{ScreenPoint, Viewport};

/// Explicit configuration handed to the session at construction; the
/// session holds no process-wide state.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// The color correction matrix, already validated as invertible.
    pub ccm: Ccm,
}

#[derive(Debug, Clone, PartialEq)]
enum InteractionState {
    Idle,
    Panning { last: ScreenPoint },
    SelectingArmed,
    Selecting { start: ScreenPoint, end: ScreenPoint },
}

/// One image-viewing session: an immutable source, a preview, a viewport,
/// and the interaction state machine that ties them together.
#[derive(Debug)]
pub struct Session {
    ccm: Ccm,
    source: SourceImage,
    preview: PreviewImage,
    viewport: Viewport,
    state: InteractionState,
    modifier_held: bool,
    selection: Option<SelectionRect>,
    gains: Option<GainVector>,
}

impl Session {
    /// Start a session over a freshly loaded image.
    pub fn new(source: SourceImage, viewport_width: f32, viewport_height: f32, config: SessionConfig) -> Self {
        let preview = PreviewImage::from_source(&source);
        let viewport = Viewport::new(source.width(), source.height(), viewport_width, viewport_height);
        Self {
            ccm: config.ccm,
            source,
            preview,
            viewport,
            state: InteractionState::Idle,
            modifier_held: false,
            selection: None,
            gains: None,
        }
    }

    /// Replace the image: resets the viewport, clears any selection, and
    /// discards the corrected preview.
    pub fn load_image(&mut self, source: SourceImage) {
        let (vw, vh) = self.viewport.viewport_size();
        self.preview = PreviewImage::from_source(&source);
        self.viewport = Viewport::new(source.width(), source.height(), vw, vh);
        self.source = source;
        self.state = InteractionState::Idle;
        self.selection = None;
        self.gains = None;
    }

    /// The pristine source image.
    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    /// The current display buffer.
    pub fn preview(&self) -> &PreviewImage {
        &self.preview
    }

    /// The viewport transform.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The accepted selection and its gains, once a valid patch has been
    /// chosen, for the external naming/output stage.
    pub fn accepted(&self) -> Option<(SelectionRect, GainVector)> {
        self.selection.zip(self.gains)
    }

    /// The in-progress drag rectangle in image coordinates, for overlay
    /// drawing. `None` outside a selection drag.
    pub fn pending_selection(&self) -> Option<SelectionRect> {
        match self.state {
            InteractionState::Selecting { start, end } => {
                Some(self.rect_from_drag(start, end))
            }
            _ => None,
        }
    }

    /// Cursor shape for the embedding shell.
    pub fn cursor(&self) -> CursorShape {
        match self.state {
            InteractionState::Panning { .. } => CursorShape::ClosedHand,
            _ if self.modifier_held => CursorShape::Crosshair,
            _ => CursorShape::Arrow,
        }
    }

    /// Advance the state machine by one input event.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { button: PointerButton::Left, pos } => self.pointer_down(pos),
            InputEvent::PointerMove { pos } => self.pointer_move(pos),
            InputEvent::PointerUp { button: PointerButton::Left, pos } => self.pointer_up(pos),
            InputEvent::Wheel { delta, pos } => self.wheel(delta, pos),
            InputEvent::ModifierDown => self.modifier_down(),
            InputEvent::ModifierUp => self.modifier_up(),
            InputEvent::ViewportResized { width, height } => {
                self.viewport.set_viewport_size(width, height);
            }
            // Only the primary button participates in pan/select gestures.
            InputEvent::PointerDown { .. } | InputEvent::PointerUp { .. } => {}
        }
    }

    fn pointer_down(&mut self, pos: ScreenPoint) {
        match self.state {
            InteractionState::SelectingArmed => {
                // A new selection discards the previous one and its gains.
                self.clear_selection();
                self.state = InteractionState::Selecting { start: pos, end: pos };
            }
            InteractionState::Idle => {
                // A new pan gesture clears any accepted rectangle.
                self.clear_selection();
                self.state = InteractionState::Panning { last: pos };
            }
            _ => {}
        }
    }

    fn pointer_move(&mut self, pos: ScreenPoint) {
        match &mut self.state {
            InteractionState::Panning { last } => {
                let (dx, dy) = (pos.x - last.x, pos.y - last.y);
                *last = pos;
                self.viewport.pan_by(dx, dy);
            }
            InteractionState::Selecting { end, .. } => {
                *end = pos;
            }
            _ => {}
        }
    }

    fn pointer_up(&mut self, pos: ScreenPoint) {
        match self.state {
            InteractionState::Panning { .. } => {
                // Re-arm immediately when the modifier went down mid-pan.
                self.state = if self.modifier_held {
                    InteractionState::SelectingArmed
                } else {
                    InteractionState::Idle
                };
            }
            InteractionState::Selecting { start, .. } => {
                self.state = InteractionState::SelectingArmed;
                let rect = self.rect_from_drag(start, pos);
                self.finalize_selection(rect);
            }
            _ => {}
        }
    }

    fn wheel(&mut self, delta: f32, pos: ScreenPoint) {
        // Zoom invalidates any selection, pending or accepted.
        self.clear_selection();
        self.viewport.zoom_at(pos, delta);
        self.state = if self.modifier_held {
            InteractionState::SelectingArmed
        } else {
            InteractionState::Idle
        };
    }

    fn modifier_down(&mut self) {
        self.modifier_held = true;
        if self.state == InteractionState::Idle {
            self.clear_selection();
            self.state = InteractionState::SelectingArmed;
        }
    }

    fn modifier_up(&mut self) {
        self.modifier_held = false;
        match self.state {
            // The accepted rectangle is retained on disarm.
            InteractionState::SelectingArmed => self.state = InteractionState::Idle,
            // Releasing mid-drag abandons the drag.
            InteractionState::Selecting { .. } => self.state = InteractionState::Idle,
            _ => {}
        }
    }

    fn finalize_selection(&mut self, rect: SelectionRect) {
        if !rect.is_valid() {
            tracing::debug!(
                "selection {}x{} below minimum size, cleared",
                rect.width,
                rect.height
            );
            self.clear_selection();
            return;
        }

        match balance::correct_white_balance(&self.source, &self.ccm, rect) {
            Ok((preview, gains)) => {
                self.preview = preview;
                self.selection = Some(rect);
                self.gains = Some(gains);
            }
            Err(err @ (BalanceError::Saturated { .. } | BalanceError::InvalidSelection)) => {
                tracing::warn!("selection rejected: {err}");
                self.clear_selection();
            }
            Err(err) => {
                // OutOfBounds / SingularMatrix indicate a bug upstream; the
                // preview is still left untouched.
                tracing::error!("white balance failed: {err}");
                self.clear_selection();
            }
        }
    }

    /// Convert a screen-space drag into an image-space rectangle, clamped
    /// to the image so the sampler contract holds.
    fn rect_from_drag(&self, start: ScreenPoint, end: ScreenPoint) -> SelectionRect {
        let a = self.clamp_to_image(self.viewport.screen_to_image(start));
        let b = self.clamp_to_image(self.viewport.screen_to_image(end));
        SelectionRect::from_corners(a, b)
    }

    fn clamp_to_image(&self, pt: crate::viewport::ImagePoint) -> crate::viewport::ImagePoint {
        crate::viewport::ImagePoint {
            x: pt.x.clamp(0, self.source.width() as i32),
            y: pt.y.clamp(0, self.source.height() as i32),
        }
    }

    fn clear_selection(&mut self) {
        self.selection = None;
        self.gains = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::InputEvent as Ev;

    const VIEW_W: f32 = 64.0;
    const VIEW_H: f32 = 64.0;

    fn gray_session() -> Session {
        // 64x64 mid-gray image in a same-sized viewport: zoom 1.0, so
        // screen and image coordinates coincide.
        let source = SourceImage::new(64, 64, vec![[128, 128, 128]; 64 * 64]).unwrap();
        Session::new(source, VIEW_W, VIEW_H, SessionConfig::default())
    }

    fn at(x: f32, y: f32) -> ScreenPoint {
        ScreenPoint::new(x, y)
    }

    fn drag_selection(session: &mut Session, from: ScreenPoint, to: ScreenPoint) {
        session.handle_event(Ev::ModifierDown);
        session.handle_event(Ev::PointerDown { button: PointerButton::Left, pos: from });
        session.handle_event(Ev::PointerMove { pos: to });
        session.handle_event(Ev::PointerUp { button: PointerButton::Left, pos: to });
    }

    #[test]
    fn test_pan_scrolls_without_selecting() {
        let mut session = gray_session();
        // Zoom in so there is scroll range to use.
        session.handle_event(Ev::Wheel { delta: 1.0, pos: at(32.0, 32.0) });
        session.handle_event(Ev::PointerDown { button: PointerButton::Left, pos: at(40.0, 40.0) });
        session.handle_event(Ev::PointerMove { pos: at(30.0, 35.0) });
        session.handle_event(Ev::PointerUp { button: PointerButton::Left, pos: at(30.0, 35.0) });
        assert!(session.viewport().scroll() != (0.0, 0.0) || session.viewport().zoom() > 1.0);
        assert!(session.accepted().is_none());
        assert_eq!(session.cursor(), CursorShape::Arrow);
    }

    #[test]
    fn test_modifier_drag_accepts_selection_and_corrects() {
        let mut session = gray_session();
        drag_selection(&mut session, at(10.0, 10.0), at(40.0, 40.0));

        let (rect, gains) = session.accepted().expect("selection should be accepted");
        assert_eq!(rect, SelectionRect { x: 10, y: 10, width: 30, height: 30 });
        // Gray patch: neutral gains, preview replaced by a corrected buffer.
        assert!((gains.min() - 1.0).abs() < 1e-5);
        assert_eq!(session.cursor(), CursorShape::Crosshair);
    }

    #[test]
    fn test_small_drag_is_rejected() {
        let mut session = gray_session();
        let before = session.preview().clone();
        drag_selection(&mut session, at(10.0, 10.0), at(19.0, 60.0));
        assert!(session.accepted().is_none(), "9px wide drag must be rejected");
        assert_eq!(session.preview(), &before, "preview must be untouched");
    }

    #[test]
    fn test_saturated_patch_leaves_preview_untouched() {
        let source = SourceImage::new(64, 64, vec![[250, 250, 250]; 64 * 64]).unwrap();
        let mut session = Session::new(source, VIEW_W, VIEW_H, SessionConfig::default());
        let before = session.preview().clone();
        drag_selection(&mut session, at(5.0, 5.0), at(45.0, 45.0));
        assert!(session.accepted().is_none());
        assert_eq!(session.preview(), &before);
        // Still armed: the user can immediately try another patch.
        assert_eq!(session.cursor(), CursorShape::Crosshair);
    }

    #[test]
    fn test_wheel_clears_selection() {
        let mut session = gray_session();
        drag_selection(&mut session, at(10.0, 10.0), at(40.0, 40.0));
        assert!(session.accepted().is_some());
        session.handle_event(Ev::Wheel { delta: 1.0, pos: at(32.0, 32.0) });
        assert!(session.accepted().is_none(), "zoom must clear the selection");
        // Modifier still held, so the session stays armed.
        assert_eq!(session.cursor(), CursorShape::Crosshair);
    }

    #[test]
    fn test_modifier_up_retains_selection() {
        let mut session = gray_session();
        drag_selection(&mut session, at(10.0, 10.0), at(40.0, 40.0));
        session.handle_event(Ev::ModifierUp);
        assert!(session.accepted().is_some(), "disarm keeps the accepted rect");
        assert_eq!(session.cursor(), CursorShape::Arrow);
    }

    #[test]
    fn test_new_pan_gesture_clears_selection() {
        let mut session = gray_session();
        drag_selection(&mut session, at(10.0, 10.0), at(40.0, 40.0));
        session.handle_event(Ev::ModifierUp);
        session.handle_event(Ev::PointerDown { button: PointerButton::Left, pos: at(5.0, 5.0) });
        assert!(session.accepted().is_none());
        assert_eq!(session.cursor(), CursorShape::ClosedHand);
    }

    #[test]
    fn test_drag_endpoints_clamp_to_image() {
        let mut session = gray_session();
        drag_selection(&mut session, at(50.0, 50.0), at(500.0, 500.0));
        let (rect, _) = session.accepted().expect("clamped drag is still valid");
        assert!(rect.fits_within(64, 64), "{rect:?}");
    }

    #[test]
    fn test_load_image_resets_state() {
        let mut session = gray_session();
        drag_selection(&mut session, at(10.0, 10.0), at(40.0, 40.0));
        session.handle_event(Ev::Wheel { delta: 1.0, pos: at(32.0, 32.0) });

        let next = SourceImage::new(32, 32, vec![[90, 90, 90]; 32 * 32]).unwrap();
        session.load_image(next.clone());
        assert!(session.accepted().is_none());
        assert_eq!(session.preview().pixels(), next.pixels());
        assert_eq!(session.viewport().zoom(), session.viewport().min_zoom());
    }

    #[test]
    fn test_pending_selection_tracks_drag() {
        let mut session = gray_session();
        session.handle_event(Ev::ModifierDown);
        session.handle_event(Ev::PointerDown { button: PointerButton::Left, pos: at(8.0, 8.0) });
        session.handle_event(Ev::PointerMove { pos: at(20.0, 24.0) });
        let pending = session.pending_selection().expect("drag in progress");
        assert_eq!(pending, SelectionRect { x: 8, y: 8, width: 12, height: 16 });
        session.handle_event(Ev::ModifierUp);
        assert!(session.pending_selection().is_none(), "release abandons the drag");
    }
}
