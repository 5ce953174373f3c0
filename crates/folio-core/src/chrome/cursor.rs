#![forbid(unsafe_code)]

//! Blob cursor follower and hover parallax.

/// Fraction of the remaining distance covered per frame.
pub const CURSOR_FOLLOW_RATIO: f64 = 0.65;
/// Blob opacity once the pointer has moved.
pub const CURSOR_IDLE_OPACITY: f64 = 0.15;
/// Blob opacity while hovering an interactive element.
pub const CURSOR_HOVER_OPACITY: f64 = 0.25;
/// Maximum parallax translation for hovered elements, in px.
pub const PARALLAX_MOVEMENT_PX: f64 = 8.0;

const OFFSCREEN: f64 = -1000.0;

/// Eases a blob toward the pointer by linear interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorFollower {
    ratio: f64,
    pointer: (f64, f64),
    position: (f64, f64),
    moved: bool,
    hovering: bool,
}

impl CursorFollower {
    /// Follower starting off-screen. `ratio` is clamped into `(0, 1]`.
    #[must_use]
    pub fn new(ratio: f64) -> Self {
        let ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio.min(1.0)
        } else {
            CURSOR_FOLLOW_RATIO
        };
        Self {
            ratio,
            pointer: (OFFSCREEN, OFFSCREEN),
            position: (OFFSCREEN, OFFSCREEN),
            moved: false,
            hovering: false,
        }
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer = (x, y);
        self.moved = true;
    }

    pub fn set_hovering(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    #[must_use]
    pub const fn position(&self) -> (f64, f64) {
        self.position
    }

    /// Advance one animation frame and return the new blob position.
    pub fn step(&mut self) -> (f64, f64) {
        let (px, py) = self.pointer;
        let (x, y) = self.position;
        self.position = (x + (px - x) * self.ratio, y + (py - y) * self.ratio);
        self.position
    }

    /// Blob opacity, or `None` while the pointer has not moved yet.
    #[must_use]
    pub fn opacity(&self) -> Option<f64> {
        if !self.moved {
            None
        } else if self.hovering {
            Some(CURSOR_HOVER_OPACITY)
        } else {
            Some(CURSOR_IDLE_OPACITY)
        }
    }
}

impl Default for CursorFollower {
    fn default() -> Self {
        Self::new(CURSOR_FOLLOW_RATIO)
    }
}

/// Viewport-relative element bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Translation that nudges a hovered element toward the pointer.
///
/// Degenerate (zero-sized) rects yield no movement.
#[must_use]
pub fn parallax_offset(rect: ElementRect, pointer_x: f64, pointer_y: f64, movement: f64) -> (f64, f64) {
    let axis = |pointer: f64, start: f64, extent: f64| {
        if extent <= 0.0 {
            return 0.0;
        }
        ((pointer - start - extent / 2.0) / extent) * movement
    };
    (
        axis(pointer_x, rect.left, rect.width),
        axis(pointer_y, rect.top, rect.height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn follower_closes_distance_geometrically() {
        let mut f = CursorFollower::new(0.5);
        assert_eq!(f.opacity(), None);
        f.pointer_moved(0.0, 0.0);
        assert_eq!(f.step(), (-500.0, -500.0));
        assert_eq!(f.step(), (-250.0, -250.0));
        assert_eq!(f.opacity(), Some(CURSOR_IDLE_OPACITY));
        f.set_hovering(true);
        assert_eq!(f.opacity(), Some(CURSOR_HOVER_OPACITY));
    }

    #[test]
    fn invalid_ratio_falls_back_to_default() {
        let mut f = CursorFollower::new(f64::NAN);
        f.pointer_moved(0.0, 0.0);
        let (x, _) = f.step();
        assert!((x - (-1000.0 + 1000.0 * CURSOR_FOLLOW_RATIO)).abs() < 1e-9);
    }

    #[test]
    fn parallax_is_centered_and_bounded() {
        let rect = ElementRect {
            left: 100.0,
            top: 50.0,
            width: 200.0,
            height: 100.0,
        };
        assert_eq!(parallax_offset(rect, 200.0, 100.0, 8.0), (0.0, 0.0));
        assert_eq!(parallax_offset(rect, 300.0, 150.0, 8.0), (4.0, 4.0));
        assert_eq!(parallax_offset(rect, 100.0, 50.0, 8.0), (-4.0, -4.0));
        assert_eq!(
            parallax_offset(ElementRect::default(), 10.0, 10.0, 8.0),
            (0.0, 0.0)
        );
    }
}
