//! Viewport math — zoom and pan over a scaled image.
//!
//! The image is displayed scaled by a zoom factor and offset by scroll
//! values, with the zoom floor chosen so the image always fills the
//! viewport. Zooming is anchor-preserving: the pixel under the pointer stays
//! under the pointer as magnification changes.

use serde::{Deserialize, Serialize};

/// Upper zoom bound.
pub const MAX_ZOOM: f32 = 5.0;

/// Multiplier applied per wheel step when zooming in.
const ZOOM_IN_STEP: f32 = 1.1;
/// Multiplier applied per wheel step when zooming out.
const ZOOM_OUT_STEP: f32 = 0.9;

/// A point in viewport (screen) coordinates, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A pixel position in original-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePoint {
    pub x: i32,
    pub y: i32,
}

/// Zoom/pan state for one image in one viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    image_width: u32,
    image_height: u32,
    viewport_width: f32,
    viewport_height: f32,
    zoom: f32,
    min_zoom: f32,
    scroll_x: f32,
    scroll_y: f32,
}

impl Viewport {
    /// Create a viewport showing the whole image at the minimum zoom.
    pub fn new(image_width: u32, image_height: u32, viewport_width: f32, viewport_height: f32) -> Self {
        let mut vp = Self {
            image_width,
            image_height,
            viewport_width,
            viewport_height,
            zoom: 1.0,
            min_zoom: 1.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
        };
        vp.update_min_zoom();
        vp.zoom = vp.min_zoom;
        vp
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// The zoom floor: the smallest factor at which the scaled image still
    /// covers the whole viewport.
    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    /// Current scroll offsets `(sx, sy)`.
    pub fn scroll(&self) -> (f32, f32) {
        (self.scroll_x, self.scroll_y)
    }

    /// On-screen viewport size in pixels.
    pub fn viewport_size(&self) -> (f32, f32) {
        (self.viewport_width, self.viewport_height)
    }

    /// Size of the scaled image, in screen pixels.
    pub fn scaled_size(&self) -> (f32, f32) {
        (
            self.image_width as f32 * self.zoom,
            self.image_height as f32 * self.zoom,
        )
    }

    /// Largest valid scroll offsets for the current zoom.
    pub fn max_scroll(&self) -> (f32, f32) {
        let (sw, sh) = self.scaled_size();
        (
            (sw - self.viewport_width).max(0.0),
            (sh - self.viewport_height).max(0.0),
        )
    }

    /// Zoom in or out by one wheel step, keeping the pixel under `pointer`
    /// (viewport coordinates) visually fixed.
    pub fn zoom_at(&mut self, pointer: ScreenPoint, wheel_delta: f32) {
        // Pointer position as a ratio of the scaled image, before rescaling.
        let (old_w, old_h) = self.scaled_size();
        let ratio_x = (pointer.x + self.scroll_x) / old_w;
        let ratio_y = (pointer.y + self.scroll_y) / old_h;

        let step = if wheel_delta > 0.0 { ZOOM_IN_STEP } else { ZOOM_OUT_STEP };
        self.zoom = (self.zoom * step).clamp(self.min_zoom, MAX_ZOOM);

        // Recompute scroll so the same ratio lands back under the pointer.
        let (new_w, new_h) = self.scaled_size();
        self.scroll_x = ratio_x * new_w - pointer.x;
        self.scroll_y = ratio_y * new_h - pointer.y;
        self.clamp_scroll();
    }

    /// Shift the view by a pointer drag delta (screen pixels). Dragging
    /// right moves the image right, i.e. decreases the scroll offset.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.scroll_x -= dx;
        self.scroll_y -= dy;
        self.clamp_scroll();
    }

    /// Map an image pixel to viewport coordinates.
    pub fn image_to_screen(&self, pt: ImagePoint) -> ScreenPoint {
        ScreenPoint {
            x: pt.x as f32 * self.zoom - self.scroll_x,
            y: pt.y as f32 * self.zoom - self.scroll_y,
        }
    }

    /// Map a viewport position to original-image pixel coordinates,
    /// truncating toward zero.
    pub fn screen_to_image(&self, pt: ScreenPoint) -> ImagePoint {
        ImagePoint {
            x: ((pt.x + self.scroll_x) / self.zoom) as i32,
            y: ((pt.y + self.scroll_y) / self.zoom) as i32,
        }
    }

    /// Handle a viewport resize: the zoom floor moves, and the current zoom
    /// and scroll are re-clamped against it.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.update_min_zoom();
        if self.zoom < self.min_zoom {
            self.zoom = self.min_zoom;
        }
        self.clamp_scroll();
    }

    fn update_min_zoom(&mut self) {
        let width_ratio = self.viewport_width / self.image_width as f32;
        let height_ratio = self.viewport_height / self.image_height as f32;
        self.min_zoom = width_ratio.max(height_ratio).min(MAX_ZOOM);
    }

    fn clamp_scroll(&mut self) {
        let (mx, my) = self.max_scroll();
        self.scroll_x = self.scroll_x.clamp(0.0, mx);
        self.scroll_y = self.scroll_y.clamp(0.0, my);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        // 1000x800 image in a 500x400 viewport: min zoom 0.5.
        Viewport::new(1000, 800, 500.0, 400.0)
    }

    #[test]
    fn test_min_zoom_fills_viewport() {
        let vp = viewport();
        assert_eq!(vp.min_zoom(), 0.5);
        assert_eq!(vp.zoom(), 0.5);
        // Taller-than-wide viewport picks the larger ratio.
        let vp = Viewport::new(1000, 400, 500.0, 400.0);
        assert_eq!(vp.min_zoom(), 1.0);
    }

    #[test]
    fn test_zoom_clamps_to_range() {
        let mut vp = viewport();
        for _ in 0..100 {
            vp.zoom_at(ScreenPoint::new(250.0, 200.0), 1.0);
        }
        assert_eq!(vp.zoom(), MAX_ZOOM);
        for _ in 0..200 {
            vp.zoom_at(ScreenPoint::new(250.0, 200.0), -1.0);
        }
        assert_eq!(vp.zoom(), vp.min_zoom());
    }

    #[test]
    fn test_zoom_keeps_pointer_anchor() {
        let mut vp = viewport();
        // Zoom in a few steps away from the clamped floor first.
        let pointer = ScreenPoint::new(250.0, 200.0);
        for _ in 0..8 {
            vp.zoom_at(pointer, 1.0);
        }
        let before = vp.screen_to_image(pointer);
        vp.zoom_at(pointer, 1.0);
        let after = vp.screen_to_image(pointer);
        // The same image pixel stays under the pointer, within truncation.
        assert!((before.x - after.x).abs() <= 1, "{before:?} vs {after:?}");
        assert!((before.y - after.y).abs() <= 1, "{before:?} vs {after:?}");
    }

    #[test]
    fn test_scroll_stays_in_range_after_zoom() {
        let mut vp = viewport();
        let corners = [
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(500.0, 400.0),
            ScreenPoint::new(0.0, 400.0),
            ScreenPoint::new(500.0, 0.0),
        ];
        for i in 0..40 {
            let delta = if i % 3 == 0 { -1.0 } else { 1.0 };
            vp.zoom_at(corners[i % corners.len()], delta);
            let (sx, sy) = vp.scroll();
            let (mx, my) = vp.max_scroll();
            assert!((0.0..=mx).contains(&sx), "sx {sx} not in [0, {mx}]");
            assert!((0.0..=my).contains(&sy), "sy {sy} not in [0, {my}]");
        }
    }

    #[test]
    fn test_screen_image_round_trip() {
        let mut vp = viewport();
        for _ in 0..5 {
            vp.zoom_at(ScreenPoint::new(100.0, 100.0), 1.0);
        }
        // Tolerance covers truncation: one screen pixel spans 1/zoom image
        // pixels.
        let tolerance = (1.0 / vp.zoom()).ceil() as i32;
        for &(x, y) in &[(0, 0), (37, 91), (400, 300), (999, 799)] {
            let p = ImagePoint { x, y };
            let back = vp.screen_to_image(vp.image_to_screen(p));
            assert!(
                (back.x - p.x).abs() <= tolerance && (back.y - p.y).abs() <= tolerance,
                "{p:?} -> {back:?} at zoom {}",
                vp.zoom()
            );
        }
    }

    #[test]
    fn test_pan_clamps_to_bounds() {
        let mut vp = viewport();
        for _ in 0..10 {
            vp.zoom_at(ScreenPoint::new(250.0, 200.0), 1.0);
        }
        vp.pan_by(1e6, 1e6);
        assert_eq!(vp.scroll(), (0.0, 0.0));
        vp.pan_by(-1e6, -1e6);
        assert_eq!(vp.scroll(), vp.max_scroll());
    }

    #[test]
    fn test_resize_raises_zoom_to_new_floor() {
        let mut vp = viewport();
        assert_eq!(vp.zoom(), 0.5);
        vp.set_viewport_size(1000.0, 800.0);
        assert_eq!(vp.min_zoom(), 1.0);
        assert_eq!(vp.zoom(), 1.0);
    }
}
