#![forbid(unsafe_code)]

//! Scroll-linked navigation chrome and the mobile menu toggle.

/// Scroll depth after which scrolling down hides the top nav.
pub const NAV_HIDE_AFTER_PX: f64 = 100.0;
/// Scroll depth after which the scroll-to-top button shows.
pub const SCROLL_TOP_VISIBLE_AFTER_PX: f64 = 500.0;
/// Viewport width at or below which the scroll-to-top button is removed.
pub const SCROLL_TOP_MIN_WIDTH_PX: f64 = 1024.0;

/// Hides the top navigation while the user scrolls down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavAutoHide {
    hide_after: f64,
    last_y: f64,
    hidden: bool,
}

impl NavAutoHide {
    #[must_use]
    pub const fn new(hide_after: f64, initial_y: f64) -> Self {
        Self {
            hide_after,
            last_y: initial_y,
            hidden: false,
        }
    }

    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Feed a scroll position; returns whether the nav should be hidden.
    pub fn on_scroll(&mut self, y: f64) -> bool {
        self.hidden = y > self.last_y && y > self.hide_after;
        self.last_y = y;
        self.hidden
    }
}

impl Default for NavAutoHide {
    fn default() -> Self {
        Self::new(NAV_HIDE_AFTER_PX, 0.0)
    }
}

/// The floating scroll-to-top button.
///
/// The button only exists on wide viewports. A freshly created button
/// starts hidden and shows once the page is scrolled deep enough.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTopButton {
    visible_after: f64,
    min_width: f64,
    present: bool,
    visible: bool,
}

impl ScrollTopButton {
    #[must_use]
    pub const fn new(visible_after: f64, min_width: f64) -> Self {
        Self {
            visible_after,
            min_width,
            present: false,
            visible: false,
        }
    }

    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.present
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Feed the viewport width; returns the new presence when it changed.
    pub fn on_viewport_width(&mut self, width: f64) -> Option<bool> {
        if !width.is_finite() {
            return None;
        }
        let present = width > self.min_width;
        if present == self.present {
            return None;
        }
        self.present = present;
        self.visible = false;
        Some(present)
    }

    /// Feed a scroll position; returns the new visibility when it changed.
    ///
    /// Always `None` while the button is absent.
    pub fn on_scroll(&mut self, y: f64) -> Option<bool> {
        if !self.present {
            return None;
        }
        let visible = y > self.visible_after;
        if visible == self.visible {
            return None;
        }
        self.visible = visible;
        Some(visible)
    }
}

impl Default for ScrollTopButton {
    fn default() -> Self {
        Self::new(SCROLL_TOP_VISIBLE_AFTER_PX, SCROLL_TOP_MIN_WIDTH_PX)
    }
}

/// Hamburger menu open state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuToggle {
    open: bool,
}

impl MenuToggle {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the menu; returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Close the menu (a link inside it was followed). Returns whether it was open.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }
}
